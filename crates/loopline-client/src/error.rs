//! Client error types.

use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Connection to the server failed.
    #[error("connection error: {0}")]
    Connection(String),

    /// Protocol/framing error.
    #[error("protocol error: {0}")]
    Protocol(#[from] loopline_protocol::ProtocolError),

    /// Request timed out.
    #[error("timeout: {0}")]
    Timeout(String),

    /// The payload given to `send` is not valid JSON.
    #[error("payload is not valid JSON: {0} (use --raw to send it anyway)")]
    InvalidPayload(String),

    /// Server-side failure while running `serve`.
    #[error("server error: {0}")]
    Server(#[from] loopline_server::ServerError),
}
