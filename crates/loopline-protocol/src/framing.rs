//! Newline-delimited message framing.
//!
//! Requests are framed by a single `\n` byte:
//!
//! ```text
//! +---------------------+------+
//! |  JSON value (UTF-8) | '\n' |
//! +---------------------+------+
//! ```
//!
//! Replies carry no delimiter; the server closing the connection is the
//! frame boundary on the response side.

use serde_json::Value;

use crate::MAX_LINE_BYTES;
use crate::error::{ProtocolError, ProtocolResult};
use crate::types::Reply;

/// Encodes a request frame: the serialized value plus the newline delimiter.
pub fn encode_request_line(value: &Value) -> ProtocolResult<Vec<u8>> {
    let mut line = serde_json::to_vec(value)?;
    line.push(b'\n');

    if line.len() > MAX_LINE_BYTES {
        return Err(ProtocolError::LineTooLong {
            size: line.len(),
            max: MAX_LINE_BYTES,
        });
    }

    Ok(line)
}

/// Returns the message body of a buffered frame: the bytes before the first
/// newline, or the whole buffer when the peer closed without sending one.
/// Bytes after the newline are not part of the message.
pub fn split_frame(buf: &[u8]) -> &[u8] {
    match buf.iter().position(|&b| b == b'\n') {
        Some(pos) => &buf[..pos],
        None => buf,
    }
}

/// Decodes a message body into a JSON value.
pub fn parse_request(body: &[u8]) -> ProtocolResult<Value> {
    Ok(serde_json::from_slice(body)?)
}

/// Encodes a reply envelope, without a trailing newline.
pub fn encode_reply(reply: &Reply) -> ProtocolResult<Vec<u8>> {
    Ok(serde_json::to_vec(reply)?)
}

/// Decodes the bytes a server sent back into a reply envelope.
pub fn parse_reply(data: &[u8]) -> ProtocolResult<Reply> {
    Ok(serde_json::from_slice(data)?)
}
