//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// loopline - JSON echo-and-classify service on the loopback interface
#[derive(Debug, Parser)]
#[command(name = "loopline")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "LOOPLINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Port on 127.0.0.1 (overrides the config file)
    #[arg(long, short)]
    pub port: Option<u16>,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the service in the foreground until SIGINT/SIGTERM
    Serve,

    /// Send one JSON line and print the reply
    Send {
        /// Payload to send; read from stdin when omitted
        payload: Option<String>,

        /// Send the payload bytes as-is, skipping the local JSON check
        #[arg(long)]
        raw: bool,

        /// Seconds to wait for connect, send, and reply
        #[arg(long, default_value_t = 5)]
        timeout: u64,
    },
}
