//! Send command — one-shot client round trip.

use std::io::Read;
use std::time::Duration;

use loopline_protocol::ProtocolError;

use crate::error::{ClientError, ClientResult};
use crate::socket::SocketClient;

/// Sends one payload and prints the reply envelope to stdout.
///
/// The payload is checked to be valid JSON locally unless `raw` is set;
/// `raw` exists so the server's parse-error reply can be exercised from
/// the command line.
pub async fn run(port: u16, payload: Option<String>, raw: bool, timeout: u64) -> ClientResult<()> {
    let payload = match payload {
        Some(p) => p,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let client = SocketClient::new(port, Duration::from_secs(timeout));

    let reply = if raw {
        client.send_raw(payload.as_bytes()).await?
    } else {
        let value: serde_json::Value = serde_json::from_str(&payload)
            .map_err(|e| ClientError::InvalidPayload(e.to_string()))?;
        client.send(&value).await?
    };

    let rendered = serde_json::to_string_pretty(&reply).map_err(ProtocolError::from)?;
    println!("{rendered}");

    Ok(())
}
