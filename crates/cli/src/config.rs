// Local configuration for the console.
//
// Global config: `~/.vaultsock/config.toml`

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Root directory for vaultsock global state: `~/.vaultsock/`.
pub fn global_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".vaultsock"))
}

/// Path to the global config file: `~/.vaultsock/config.toml`.
pub fn global_config_path() -> Option<PathBuf> {
    global_dir().map(|dir| dir.join("config.toml"))
}

/// Global console configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default WebSocket URL offered to `connect` (e.g. `ws://localhost:8080/`).
    pub server_url: Option<String>,
    /// Follow the newest log entry after each append.
    pub autoscroll: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self { server_url: None, autoscroll: true }
    }
}

impl GlobalConfig {
    /// Load from `~/.vaultsock/config.toml`. Returns defaults if the file
    /// doesn't exist or can't be parsed.
    pub fn load() -> Self {
        global_config_path().and_then(|path| Self::load_from(&path).ok()).unwrap_or_default()
    }

    /// Load from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        toml::from_str(&contents).map_err(ConfigError::Parse)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[source] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[source] toml::de::Error),
}
