//! Server configuration.
//!
//! A small JSON5 file plus env/flag overrides. The file lives at
//! `$QUICKPOLL_CONFIG` if set, else `<config_dir>/quickpoll/config.json5`;
//! a missing file just means defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Well-known default listen port.
pub const DEFAULT_PORT: u16 = 3000;
/// Default bind address.
pub const DEFAULT_BIND: &str = "127.0.0.1";

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse { path: PathBuf, source: json5::Error },
}

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Bind address
    pub bind: String,
    /// Listen port
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    /// Apply overrides on top of the file values.
    ///
    /// Precedence: CLI flags beat the `QUICKPOLL_PORT` env var, which beats
    /// the config file.
    pub fn resolve(mut self, port: Option<u16>, bind: Option<String>) -> Self {
        if let Ok(raw) = std::env::var("QUICKPOLL_PORT") {
            match raw.parse() {
                Ok(port) => self.port = port,
                Err(_) => tracing::warn!(value = %raw, "ignoring invalid QUICKPOLL_PORT"),
            }
        }
        if let Some(port) = port {
            self.port = port;
        }
        if let Some(bind) = bind {
            self.bind = bind;
        }
        self
    }
}

/// Resolve the configuration file path.
pub fn get_config_path() -> PathBuf {
    if let Ok(path) = std::env::var("QUICKPOLL_CONFIG") {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quickpoll")
        .join("config.json5")
}

/// Load configuration from the resolved path.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&get_config_path())
}

/// Load configuration from a specific file. A missing file yields defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    json5::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
