//! CLI subcommand implementations.

pub mod send;
pub mod serve;
