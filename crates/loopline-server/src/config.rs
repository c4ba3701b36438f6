//! Server configuration.

use std::net::{Ipv4Addr, SocketAddr};

use loopline_protocol::{DEFAULT_PORT, MAX_LINE_BYTES};

/// Server configuration.
///
/// Only the port and the line cap are configurable. The listener always
/// binds the loopback address: reachability from other hosts is ruled out
/// at bind time, not by a policy layered above it.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// TCP port to listen on. Use 0 to let the OS pick one (tests).
    pub port: u16,

    /// Maximum accepted request line size in bytes.
    pub max_line_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            max_line_bytes: MAX_LINE_BYTES,
        }
    }
}

impl ServerConfig {
    /// Creates a configuration listening on the given loopback port.
    pub fn new(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Builder: set the maximum request line size.
    pub fn with_max_line_bytes(mut self, max: usize) -> Self {
        self.max_line_bytes = max;
        self
    }

    /// The address the listener binds. Always loopback.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::LOCALHOST, self.port))
    }
}
