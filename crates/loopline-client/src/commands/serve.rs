//! Serve command — runs the service in the foreground.
//!
//! Wires together the server pieces:
//! - signal handler (SIGTERM/SIGINT for shutdown)
//! - loopback socket server
//! - shared stats, logged once on the way out

use tracing::info;

use loopline_server::{
    ServerConfig, SignalHandler, SocketServer, make_connection_handler, new_shared_stats,
};

use crate::error::ClientResult;

/// Starts the service in the foreground.
///
/// Blocks until a shutdown signal is received. In-flight connections are
/// best effort; they end with the process.
pub async fn run(port: u16) -> ClientResult<()> {
    let signal_handler = SignalHandler::new();
    signal_handler.spawn_listener();

    let stats = new_shared_stats();

    let server = SocketServer::bind(ServerConfig::new(port)).await?;
    let addr = server.local_addr()?;
    info!(addr = %addr, "service ready; one JSON value per connection, newline-terminated");

    let handler = make_connection_handler(stats.clone());
    let shutdown = signal_handler.shutdown();

    server.run_until_shutdown(handler, shutdown.wait()).await?;

    let snap = stats.snapshot();
    info!(
        uptime_seconds = stats.uptime_seconds(),
        connections = snap.connections,
        text = snap.text,
        number = snap.number,
        array = snap.array,
        object = snap.object,
        unknown = snap.unknown,
        errors = snap.errors,
        classified = snap.total_classified(),
        "server stopped"
    );

    Ok(())
}
