//! Loopback JSON line service.
//!
//! This crate provides the server side of the line protocol:
//! - TCP listener pinned to 127.0.0.1 (the bind address is not configurable)
//! - one tokio task per accepted connection
//! - read one newline-terminated JSON payload, classify, reply, close
//! - shared counters reported at shutdown
//! - SIGTERM/SIGINT handling
//!
//! # Example
//!
//! ```rust,no_run
//! use loopline_server::{ServerConfig, SocketServer, make_connection_handler, new_shared_stats};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = SocketServer::bind(ServerConfig::default()).await?;
//!     let stats = new_shared_stats();
//!     server.run(make_connection_handler(stats)).await?;
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod handler;
mod signals;
mod socket;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::{
    RequestHandler, ServerStats, SharedStats, StatsSnapshot, classify_and_reply,
    make_connection_handler, new_shared_stats,
};
pub use signals::{ShutdownSignal, SignalHandler};
pub use socket::{Connection, SocketServer};
