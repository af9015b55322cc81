//! Configuration types.
//!
//! Processor settings live in `config.toml` inside the Souvenir config
//! directory. Every field is optional; a missing file means defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Runtime configuration for the module processors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Module ids whose handlers never run.
    pub disabled_modules: Vec<String>,

    /// Give up waiting for a module to be solved after this many seconds.
    /// `None` waits forever.
    pub solve_timeout_secs: Option<u64>,

    /// `tracing` filter directive, e.g. "info" or "souvenir_access=debug".
    pub log_filter: String,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            disabled_modules: Vec::new(),
            solve_timeout_secs: None,
            log_filter: "info".to_string(),
        }
    }
}

impl ProcessorConfig {
    /// Parse a config from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                tracing::info!("Loading config from: {}", path.display());
                Self::from_toml(&text)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(ConfigError::Io(e.to_string())),
        }
    }

    /// Load from the default location (see [`config_path`]).
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = config_path().ok_or(ConfigError::NoConfigDir)?;
        Self::load(&path)
    }

    /// Whether handlers for this module id are allowed to run.
    pub fn is_enabled(&self, module_id: &str) -> bool {
        !self.disabled_modules.iter().any(|m| m == module_id)
    }

    /// The solve timeout as a `Duration`.
    pub fn solve_timeout(&self) -> Option<Duration> {
        self.solve_timeout_secs.map(Duration::from_secs)
    }
}

/// Get the config directory path.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("souvenir"))
}

/// Get the path to config.toml.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("config.toml"))
}
