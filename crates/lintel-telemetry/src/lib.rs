//! Observability for Lintel.
//!
//! - **Logging**: structured JSON or pretty logs via `tracing-subscriber`
//! - **Metrics**: Prometheus-format counters via the `metrics` crate
//!
//! Discovery and the interceptor pipeline emit `tracing` events and call the
//! recording functions in [`metrics`]; this crate decides where they go.
//!
//! # Example
//!
//! ```rust,ignore
//! use lintel_telemetry::{init_telemetry, LogConfig, TelemetryConfig};
//!
//! let _guard = init_telemetry(
//!     TelemetryConfig::builder()
//!         .logging(LogConfig::development())
//!         .build(),
//! )?;
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;

pub use config::{TelemetryConfig, TelemetryConfigBuilder};
pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig, LogFormat};
pub use metrics::{init_metrics, render_metrics, MetricsConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Handle returned by [`init_telemetry`].
///
/// Keep it alive for the lifetime of the application; it gives access to the
/// rendered metrics when the recorder was installed.
#[derive(Debug)]
pub struct TelemetryGuard {
    metrics_enabled: bool,
}

impl TelemetryGuard {
    /// Returns true if the Prometheus recorder was installed.
    #[must_use]
    pub fn metrics_enabled(&self) -> bool {
        self.metrics_enabled
    }

    /// Renders current metrics in Prometheus text format.
    #[must_use]
    pub fn render_metrics(&self) -> Option<String> {
        if self.metrics_enabled {
            render_metrics()
        } else {
            None
        }
    }
}

/// Initializes logging, then metrics.
///
/// # Errors
///
/// Returns `TelemetryError` if either subsystem fails to initialize.
pub fn init_telemetry(config: TelemetryConfig) -> TelemetryResult<TelemetryGuard> {
    init_logging(&config.logging)?;
    init_metrics(&config.metrics)?;

    Ok(TelemetryGuard {
        metrics_enabled: config.metrics.enabled,
    })
}
