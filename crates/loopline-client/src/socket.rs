//! TCP client for the loopback line service.
//!
//! One shot per connection, matching the server: connect, write one
//! newline-terminated payload, read the reply until the server closes.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

use loopline_protocol::{Reply, encode_request_line, parse_reply};

use crate::error::{ClientError, ClientResult};

/// Client for the loopback JSON line service.
pub struct SocketClient {
    addr: SocketAddr,
    timeout: Duration,
}

impl SocketClient {
    /// Creates a client for 127.0.0.1 at the given port.
    pub fn new(port: u16, timeout: Duration) -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::LOCALHOST, port)),
            timeout,
        }
    }

    /// The server address this client targets.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Sends a JSON value and returns the parsed reply envelope.
    pub async fn send(&self, value: &serde_json::Value) -> ClientResult<Reply> {
        let line = encode_request_line(value)?;
        self.send_line(line).await
    }

    /// Sends raw bytes, appending the newline delimiter when missing, and
    /// returns the parsed reply. This is how the server's parse-error path
    /// is reachable from a well-behaved client.
    pub async fn send_raw(&self, payload: &[u8]) -> ClientResult<Reply> {
        let mut line = payload.to_vec();
        if line.last() != Some(&b'\n') {
            line.push(b'\n');
        }
        self.send_line(line).await
    }

    async fn send_line(&self, line: Vec<u8>) -> ClientResult<Reply> {
        debug!(addr = %self.addr, bytes = line.len(), "connecting");

        let mut stream = tokio::time::timeout(self.timeout, TcpStream::connect(self.addr))
            .await
            .map_err(|_| ClientError::Timeout("connecting".into()))?
            .map_err(|e| {
                ClientError::Connection(format!("failed to connect to {}: {}", self.addr, e))
            })?;

        tokio::time::timeout(self.timeout, async {
            stream.write_all(&line).await?;
            stream.flush().await?;
            Ok::<(), std::io::Error>(())
        })
        .await
        .map_err(|_| ClientError::Timeout("sending request".into()))??;

        debug!("request sent, waiting for reply");

        // The reply has no delimiter; the server closing the connection
        // marks the end of the frame.
        let mut data = Vec::new();
        tokio::time::timeout(self.timeout, stream.read_to_end(&mut data))
            .await
            .map_err(|_| ClientError::Timeout("reading reply".into()))??;

        if data.is_empty() {
            return Err(ClientError::Connection(
                "server closed without replying".to_string(),
            ));
        }

        Ok(parse_reply(&data)?)
    }
}
