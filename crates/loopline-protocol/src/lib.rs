//! Wire types and framing for the loopback JSON line service.
//!
//! # Protocol Overview
//!
//! A client connects over TCP to the loopback interface, sends one UTF-8
//! JSON value terminated by a single `\n` byte, and reads the reply until
//! the server closes the connection:
//!
//! ```text
//! client: <JSON value> '\n'
//! server: <JSON reply object>        (no trailing newline, then close)
//! ```
//!
//! # Reply Structure
//!
//! Every reply is a [`Reply`] envelope:
//! - `{"status":"ok","kind":<kind>,"value":<echoed value>}` when the
//!   payload parsed, where `kind` classifies the whole decoded value
//! - `{"status":"error","message":<string>}` when it did not
//!
//! # Example
//!
//! ```rust
//! use loopline_protocol::{Kind, Reply, encode_request_line, split_frame};
//!
//! let line = encode_request_line(&serde_json::json!([1, 2, 3])).unwrap();
//! assert_eq!(split_frame(&line), b"[1,2,3]".as_slice());
//!
//! let reply = Reply::classified(serde_json::json!([1, 2, 3]));
//! assert_eq!(reply.kind(), Some(Kind::Array));
//! ```

mod error;
mod framing;
mod types;

pub use error::{ProtocolError, ProtocolResult};
pub use framing::{encode_reply, encode_request_line, parse_reply, parse_request, split_frame};
pub use types::{Kind, Reply};

/// Default TCP port the service listens on.
pub const DEFAULT_PORT: u16 = 9999;

/// Maximum request line size (1 MiB), newline included.
pub const MAX_LINE_BYTES: usize = 1024 * 1024;
