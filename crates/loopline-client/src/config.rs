//! Client configuration.
//!
//! A TOML file merged under the CLI flags; flags take precedence.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use loopline_protocol::DEFAULT_PORT;

use crate::error::{ClientError, ClientResult};

/// TOML configuration file structure.
#[derive(Debug, Default, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// `[server]` table.
#[derive(Debug, Deserialize)]
pub struct ServerSection {
    /// Port on the loopback interface.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

/// `[logging]` table.
#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    /// Log level when RUST_LOG is not set.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_level() -> String {
    "info".to_string()
}

impl ClientConfig {
    /// Loads the config from the default location, or defaults when the
    /// file does not exist.
    pub fn load() -> ClientResult<Self> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Loads the config from an explicit path.
    pub fn load_from(path: &Path) -> ClientResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&contents).map_err(|e| {
            ClientError::Config(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// Resolves the port: CLI flag first, then the config file.
    pub fn resolve_port(&self, cli_port: Option<u16>) -> u16 {
        cli_port.unwrap_or(self.server.port)
    }
}

/// Default config path: `<config dir>/loopline/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("loopline").join("config.toml"))
}
