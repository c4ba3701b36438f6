//! loopline CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use loopline_client::cli::{Cli, Command};
use loopline_client::commands;
use loopline_client::config::ClientConfig;
use loopline_client::error::ClientResult;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    // Load configuration
    let config = if let Some(ref path) = cli.config {
        ClientConfig::load_from(path)?
    } else {
        ClientConfig::load().unwrap_or_default()
    };

    // Initialize tracing: --debug wins, then RUST_LOG, then the config file
    let filter = if cli.debug {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.logging.level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let port = config.resolve_port(cli.port);

    match cli.command {
        Command::Serve => commands::serve::run(port).await,
        Command::Send {
            payload,
            raw,
            timeout,
        } => commands::send::run(port, payload, raw, timeout).await,
    }
}
