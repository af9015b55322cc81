//! Logging setup.

use souvenir_core::{ConfigError, ProcessorConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Build the filter: `RUST_LOG` wins, then the configured directive.
pub fn filter(config: &ProcessorConfig) -> Result<EnvFilter, ConfigError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.log_filter)
            .map_err(|e| ConfigError::InvalidLogFilter(e.to_string())),
    }
}

/// Install the global tracing subscriber.
///
/// Log levels can be controlled via the `RUST_LOG` environment variable, e.g.
/// `RUST_LOG=info,souvenir_access=debug`. Returns `Ok(false)` if a subscriber
/// was already installed.
pub fn init(config: &ProcessorConfig) -> Result<bool, ConfigError> {
    let filter = filter(config)?;
    let installed = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!("Tracing initialized");
    }
    Ok(installed)
}
