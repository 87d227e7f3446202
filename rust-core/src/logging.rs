//! Logging setup
//!
//! The library only emits `tracing` events; hosts (benchmarks, services,
//! tests) call [`init_logging`] once to get them printed.

use tracing_subscriber::EnvFilter;

/// Errors that may occur while initializing logging.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The default directive could not be parsed.
    #[error("Invalid log filter directive '{directive}': {message}")]
    InvalidDirective { directive: String, message: String },
    /// A global subscriber is already installed.
    #[error("A global tracing subscriber is already installed: {0}")]
    AlreadyInitialized(String),
}

/// Install a fmt subscriber filtered by `RUST_LOG`, falling back to
/// `default_directive` (e.g. `"fk_spectra=debug"`) when it is unset.
pub fn init_logging(default_directive: &str) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive).map_err(|e| {
            LoggingError::InvalidDirective {
                directive: default_directive.to_string(),
                message: e.to_string(),
            }
        })?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    tracing::debug!("Logging initialized with default directive {default_directive}");
    Ok(())
}
