//! Transport configuration
//!
//! Loaded once at process start and passed by value into the entrypoint's
//! serve functions. Selects between the stdio transport and a network
//! listener.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the server talks to its clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// MCP protocol over stdin/stdout; no network parameters needed
    Stdio,
    /// Streamable HTTP listener on `host:port`
    Network,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_transport")]
    pub transport: TransportKind,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_transport() -> TransportKind {
    TransportKind::Stdio
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8020
}

impl Default for Config {
    fn default() -> Self {
        Self {
            transport: default_transport(),
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Config {
    /// Load config from standard file locations
    ///
    /// Searched in order:
    /// 1. `SHELL_MCP_CONFIG` env var
    /// 2. `./shell-mcp.toml`
    /// 3. `$XDG_CONFIG_HOME/shell-mcp/config.toml`
    /// 4. `~/.shell-mcp.toml`
    /// 5. Default config if none found
    pub fn load() -> Config {
        if let Ok(env_path) = std::env::var("SHELL_MCP_CONFIG") {
            let path = PathBuf::from(&env_path);
            if path.exists() {
                match Self::load_from(&path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from SHELL_MCP_CONFIG={}", path.display());
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!(
                            "Failed to load config from SHELL_MCP_CONFIG={}: {}",
                            path.display(),
                            e
                        );
                    }
                }
            } else {
                tracing::warn!("SHELL_MCP_CONFIG={} does not exist", env_path);
            }
        }

        let mut config_paths = vec![PathBuf::from("shell-mcp.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            config_paths.push(config_dir.join("shell-mcp").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            config_paths.push(home.join(".shell-mcp.toml"));
        }

        for path in config_paths {
            if path.exists() {
                match Self::load_from(&path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config {}: {}", path.display(), e);
                    }
                }
            }
        }

        tracing::info!("Using default configuration");
        Config::default()
    }

    /// Load and parse a single TOML config file
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Bind address for the network transport
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
