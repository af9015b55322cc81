//! Error types shared by the Souvenir crates.

use thiserror::Error;

/// Host object errors - raised while reading or writing a slot.
#[derive(Debug, Error)]
pub enum HostError {
    /// The host object has no slot with this name.
    #[error("Type '{type_name}' has no slot named '{slot}'")]
    SlotNotFound { type_name: String, slot: String },

    /// The backing store rejected the operation (e.g. a Lua error).
    #[error("Host error on '{type_name}.{slot}': {message}")]
    Backend {
        type_name: String,
        slot: String,
        message: String,
    },
}

/// Result type alias for host object operations.
pub type HostResult<T> = Result<T, HostError>;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No config directory found.
    #[error("Config directory not found")]
    NoConfigDir,

    /// IO error.
    #[error("IO error: {0}")]
    Io(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid log filter directive.
    #[error("Invalid log filter: {0}")]
    InvalidLogFilter(String),
}
