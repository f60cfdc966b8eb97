//! Facade error type.

use lintel_config::ConfigError;
use lintel_discovery::EngineError;
use lintel_telemetry::TelemetryError;
use thiserror::Error;

/// Errors surfaced by [`Bootstrap`](crate::Bootstrap).
#[derive(Debug, Error)]
pub enum LintelError {
    /// Configuration could not be loaded or validated.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A configuration pass failed to install an interceptor.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Logging or metrics could not be initialized.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

/// Result type for facade operations.
pub type LintelResult<T> = Result<T, LintelError>;
