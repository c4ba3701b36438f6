//! Loopback TCP listener and per-connection IO.
//!
//! The listener binds 127.0.0.1 only; every accepted connection is handed
//! to its own tokio task so a stalled client never blocks the accept loop
//! or other clients.

use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info};

use loopline_protocol::{ProtocolError, Reply, encode_reply, split_frame};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};

/// Receive chunk size for the line read loop.
const READ_CHUNK: usize = 1024;

/// TCP server pinned to the loopback interface.
pub struct SocketServer {
    config: ServerConfig,
    listener: TcpListener,
}

impl SocketServer {
    /// Binds the listener on 127.0.0.1 at the configured port.
    pub async fn bind(config: ServerConfig) -> ServerResult<Self> {
        let addr = config.listen_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::bind(addr, e))?;

        info!(addr = %listener.local_addr()?, "listening on loopback");

        Ok(Self { config, listener })
    }

    /// The bound address, with the OS-assigned port when 0 was requested.
    pub fn local_addr(&self) -> ServerResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts a single connection.
    pub async fn accept(&self) -> ServerResult<Connection> {
        let (stream, peer) = self.listener.accept().await?;
        debug!(peer = %peer, "accepted connection");

        Ok(Connection {
            stream,
            peer,
            max_line_bytes: self.config.max_line_bytes,
        })
    }

    /// Runs the accept loop, spawning the handler for each connection.
    ///
    /// Accept errors are logged and the loop keeps going. There is no cap
    /// on concurrent connections.
    pub async fn run<F, Fut>(&self, handler: F) -> ServerResult<()>
    where
        F: Fn(Connection) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        loop {
            match self.accept().await {
                Ok(connection) => {
                    tokio::spawn(handler(connection));
                }
                Err(e) => {
                    error!(error = %e, "failed to accept connection");
                }
            }
        }
    }

    /// Runs the accept loop until the shutdown future completes.
    ///
    /// In-flight connection tasks are not drained; they end with the
    /// process, best effort.
    pub async fn run_until_shutdown<F, Fut, S>(&self, handler: F, shutdown: S) -> ServerResult<()>
    where
        F: Fn(Connection) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
        S: std::future::Future<Output = ()> + Send,
    {
        tokio::select! {
            result = self.run(handler) => result,
            _ = shutdown => {
                info!("shutdown signal received");
                Ok(())
            }
        }
    }
}

/// A single accepted client connection.
pub struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
    max_line_bytes: usize,
}

impl Connection {
    /// The peer address. Always a loopback address.
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// Reads the message body: everything up to the first newline, or up
    /// to EOF when the client closes without sending one.
    ///
    /// Returns `Ok(None)` when the client closed without sending any bytes.
    /// There is deliberately no read timeout: a connected client that never
    /// sends a newline parks this task until it disconnects.
    pub async fn read_line(&mut self) -> ServerResult<Option<Vec<u8>>> {
        let mut buf = Vec::new();
        let mut chunk = [0u8; READ_CHUNK];

        loop {
            let n = self.stream.read(&mut chunk).await?;
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            if chunk[..n].contains(&b'\n') {
                break;
            }
            if buf.len() > self.max_line_bytes {
                return Err(ProtocolError::LineTooLong {
                    size: buf.len(),
                    max: self.max_line_bytes,
                }
                .into());
            }
        }

        if buf.is_empty() {
            return Ok(None);
        }

        let body = split_frame(&buf);
        if body.len() > self.max_line_bytes {
            return Err(ProtocolError::LineTooLong {
                size: body.len(),
                max: self.max_line_bytes,
            }
            .into());
        }

        Ok(Some(body.to_vec()))
    }

    /// Serializes and writes the reply envelope, then flushes. No trailing
    /// newline is written; dropping the connection afterwards is the frame
    /// boundary the client waits for.
    pub async fn write_reply(&mut self, reply: &Reply) -> ServerResult<()> {
        let data = encode_reply(reply)?;
        self.stream.write_all(&data).await?;
        self.stream.flush().await?;
        Ok(())
    }
}
