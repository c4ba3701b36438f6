//! Per-connection handling, classification, and running tallies.

use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use loopline_protocol::{Kind, ProtocolError, Reply, parse_request};

use crate::error::{ServerError, ServerResult};
use crate::socket::Connection;

/// Builds the reply envelope for one message body.
///
/// The classification covers the whole decoded value; booleans and null
/// fall through to `unknown`. A body that does not parse yields the error
/// envelope with the decoder's message.
pub fn classify_and_reply(body: &[u8]) -> Reply {
    match parse_request(body) {
        Ok(value) => Reply::classified(value),
        Err(e) => Reply::error(e.to_string()),
    }
}

/// Running tallies shared by all connection tasks.
///
/// Handlers only increment and the shutdown log line only reads, so
/// relaxed atomics are the whole mutual-exclusion story; no lock sits
/// anywhere near connection IO.
#[derive(Debug)]
pub struct ServerStats {
    started_at: DateTime<Utc>,
    connections: AtomicU64,
    text: AtomicU64,
    number: AtomicU64,
    array: AtomicU64,
    object: AtomicU64,
    unknown: AtomicU64,
    errors: AtomicU64,
}

impl Default for ServerStats {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerStats {
    /// Creates zeroed stats stamped with the current time.
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            connections: AtomicU64::new(0),
            text: AtomicU64::new(0),
            number: AtomicU64::new(0),
            array: AtomicU64::new(0),
            object: AtomicU64::new(0),
            unknown: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        }
    }

    /// Records an accepted connection.
    pub fn record_connection(&self) {
        self.connections.fetch_add(1, Ordering::Relaxed);
    }

    /// Records the envelope produced for one message.
    pub fn record_reply(&self, reply: &Reply) {
        let counter = match reply {
            Reply::Ok { kind, .. } => self.counter_for(*kind),
            Reply::Error { .. } => &self.errors,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn counter_for(&self, kind: Kind) -> &AtomicU64 {
        match kind {
            Kind::Text => &self.text,
            Kind::Number => &self.number,
            Kind::Array => &self.array,
            Kind::Object => &self.object,
            Kind::Unknown => &self.unknown,
        }
    }

    /// Seconds since the stats were created (server start).
    pub fn uptime_seconds(&self) -> u64 {
        let duration = Utc::now() - self.started_at;
        duration.num_seconds().max(0) as u64
    }

    /// Point-in-time copy of the counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            connections: self.connections.load(Ordering::Relaxed),
            text: self.text.load(Ordering::Relaxed),
            number: self.number.load(Ordering::Relaxed),
            array: self.array.load(Ordering::Relaxed),
            object: self.object.load(Ordering::Relaxed),
            unknown: self.unknown.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

/// Plain-data view of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub connections: u64,
    pub text: u64,
    pub number: u64,
    pub array: u64,
    pub object: u64,
    pub unknown: u64,
    pub errors: u64,
}

impl StatsSnapshot {
    /// Messages that classified successfully, errors excluded.
    pub fn total_classified(&self) -> u64 {
        self.text + self.number + self.array + self.object + self.unknown
    }
}

/// Stats shared across connection tasks.
pub type SharedStats = Arc<ServerStats>;

/// Creates a fresh shared stats handle.
pub fn new_shared_stats() -> SharedStats {
    Arc::new(ServerStats::new())
}

/// Handles accepted connections: one message, one reply, then close.
pub struct RequestHandler {
    stats: SharedStats,
}

impl RequestHandler {
    /// Creates a handler recording into the given stats.
    pub fn new(stats: SharedStats) -> Self {
        Self { stats }
    }

    /// Runs the read, parse, respond sequence for one connection.
    ///
    /// An oversized line still gets an error envelope before the close.
    /// Other failures are returned for the caller to log; the accept loop
    /// is never affected either way.
    pub async fn handle_connection(&self, mut conn: Connection) -> ServerResult<()> {
        self.stats.record_connection();

        let body = match conn.read_line().await {
            Ok(Some(body)) => body,
            Ok(None) => {
                debug!(peer = %conn.peer_addr(), "client closed without sending data");
                return Ok(());
            }
            Err(ServerError::Protocol(e @ ProtocolError::LineTooLong { .. })) => {
                let reply = Reply::error(e.to_string());
                self.stats.record_reply(&reply);
                conn.write_reply(&reply).await?;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let reply = classify_and_reply(&body);
        self.stats.record_reply(&reply);
        debug!(peer = %conn.peer_addr(), ok = reply.is_ok(), "replying");
        conn.write_reply(&reply).await
    }
}

/// Creates the connection handler closure for [`SocketServer::run`].
///
/// [`SocketServer::run`]: crate::SocketServer::run
pub fn make_connection_handler(
    stats: SharedStats,
) -> impl Fn(Connection) -> Pin<Box<dyn std::future::Future<Output = ()> + Send>> + Send + Sync + 'static
{
    move |conn| {
        let handler = RequestHandler::new(stats.clone());
        Box::pin(async move {
            let peer = conn.peer_addr();
            if let Err(e) = handler.handle_connection(conn).await {
                warn!(peer = %peer, error = %e, "connection handler error");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::socket::SocketServer;
    use loopline_protocol::parse_reply;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    #[test]
    fn classify_text() {
        let reply = classify_and_reply(b"\"hello\"");
        assert_eq!(reply.kind(), Some(Kind::Text));
    }

    #[test]
    fn classify_whole_object() {
        // The envelope classifies the decoded value itself, not its fields.
        let reply = classify_and_reply(br#"{"value": 42}"#);
        assert_eq!(reply.kind(), Some(Kind::Object));
    }

    #[test]
    fn classify_bool_and_null_as_unknown() {
        assert_eq!(classify_and_reply(b"true").kind(), Some(Kind::Unknown));
        assert_eq!(classify_and_reply(b"null").kind(), Some(Kind::Unknown));
    }

    #[test]
    fn classify_parse_failure() {
        let reply = classify_and_reply(b"not json");
        let message = reply.as_error().unwrap();
        assert!(message.starts_with("invalid JSON:"));
    }

    #[test]
    fn stats_counters() {
        let stats = ServerStats::new();
        stats.record_connection();
        stats.record_reply(&Reply::classified(json!("a")));
        stats.record_reply(&Reply::classified(json!(1)));
        stats.record_reply(&Reply::classified(json!(null)));
        stats.record_reply(&Reply::error("bad"));

        let snap = stats.snapshot();
        assert_eq!(snap.connections, 1);
        assert_eq!(snap.text, 1);
        assert_eq!(snap.number, 1);
        assert_eq!(snap.unknown, 1);
        assert_eq!(snap.errors, 1);
        assert_eq!(snap.total_classified(), 3);
    }

    async fn spawn_server(config: ServerConfig) -> (std::net::SocketAddr, SharedStats) {
        let server = SocketServer::bind(config).await.unwrap();
        let addr = server.local_addr().unwrap();
        let stats = new_shared_stats();
        let handler_stats = stats.clone();
        tokio::spawn(async move {
            let _ = server.run(make_connection_handler(handler_stats)).await;
        });
        (addr, stats)
    }

    async fn roundtrip(addr: std::net::SocketAddr, line: &[u8]) -> Reply {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(line).await.unwrap();

        let mut data = Vec::new();
        stream.read_to_end(&mut data).await.unwrap();
        parse_reply(&data).unwrap()
    }

    #[tokio::test]
    async fn handler_replies_and_closes() {
        let (addr, stats) = spawn_server(ServerConfig::new(0)).await;

        let reply = roundtrip(addr, b"[1,2,3]\n").await;
        assert_eq!(reply.kind(), Some(Kind::Array));

        let snap = stats.snapshot();
        assert_eq!(snap.connections, 1);
        assert_eq!(snap.array, 1);
    }

    #[tokio::test]
    async fn malformed_input_does_not_poison_the_server() {
        let (addr, stats) = spawn_server(ServerConfig::new(0)).await;

        let reply = roundtrip(addr, b"not json\n").await;
        assert!(!reply.is_ok());
        assert!(!reply.as_error().unwrap().is_empty());

        // The next, independent connection is served normally.
        let reply = roundtrip(addr, b"\"hello\"\n").await;
        assert_eq!(reply.kind(), Some(Kind::Text));

        let snap = stats.snapshot();
        assert_eq!(snap.connections, 2);
        assert_eq!(snap.errors, 1);
        assert_eq!(snap.text, 1);
    }

    #[tokio::test]
    async fn oversized_line_gets_error_reply() {
        let config = ServerConfig::new(0).with_max_line_bytes(32);
        let (addr, _stats) = spawn_server(config).await;

        let mut line = vec![b'1'; 128];
        line.push(b'\n');
        let reply = roundtrip(addr, &line).await;
        assert!(!reply.is_ok());
        assert!(reply.as_error().unwrap().contains("too large"));
    }

    #[tokio::test]
    async fn concurrent_clients_get_their_own_replies() {
        let (addr, stats) = spawn_server(ServerConfig::new(0)).await;

        let mut tasks = Vec::new();
        for i in 0..8u64 {
            tasks.push(tokio::spawn(async move {
                let line = format!("{i}\n");
                let reply = roundtrip(addr, line.as_bytes()).await;
                (i, reply)
            }));
        }

        for task in tasks {
            let (i, reply) = task.await.unwrap();
            match reply {
                Reply::Ok { kind, value } => {
                    assert_eq!(kind, Kind::Number);
                    assert_eq!(value, json!(i));
                }
                Reply::Error { message } => panic!("unexpected error: {message}"),
            }
        }

        let snap = stats.snapshot();
        assert_eq!(snap.connections, 8);
        assert_eq!(snap.number, 8);
    }

    #[tokio::test]
    async fn stalled_client_does_not_block_others() {
        let (addr, _stats) = spawn_server(ServerConfig::new(0)).await;

        // Connect and send nothing; the handler parks on the read.
        let stalled = TcpStream::connect(addr).await.unwrap();

        let reply = roundtrip(addr, b"{\"k\":1}\n").await;
        assert_eq!(reply.kind(), Some(Kind::Object));

        drop(stalled);
    }
}
