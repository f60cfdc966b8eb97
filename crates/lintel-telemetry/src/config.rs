//! Telemetry configuration.

use crate::logging::LogConfig;
use crate::metrics::MetricsConfig;

/// Logging and metrics settings, initialized together by
/// [`init_telemetry`](crate::init_telemetry).
///
/// Lintel's own configuration produces one of these from its `[logging]`
/// and `[metrics]` sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Prometheus recorder settings.
    pub metrics: MetricsConfig,

    /// Subscriber settings.
    pub logging: LogConfig,
}

impl TelemetryConfig {
    /// Starts from defaults: JSON logs at `info`, metrics on.
    #[must_use]
    pub fn builder() -> TelemetryConfigBuilder {
        TelemetryConfigBuilder::default()
    }

    /// Development settings: pretty debug logs, metrics on.
    #[must_use]
    pub fn development() -> Self {
        Self::builder().logging(LogConfig::development()).build()
    }
}

/// Builder for [`TelemetryConfig`].
#[derive(Debug, Default)]
pub struct TelemetryConfigBuilder {
    config: TelemetryConfig,
}

impl TelemetryConfigBuilder {
    /// Replaces the metrics section.
    #[must_use]
    pub fn metrics(mut self, metrics: MetricsConfig) -> Self {
        self.config.metrics = metrics;
        self
    }

    /// Turns the Prometheus recorder on or off.
    #[must_use]
    pub fn metrics_enabled(mut self, enabled: bool) -> Self {
        self.config.metrics.enabled = enabled;
        self
    }

    /// Replaces the logging section.
    #[must_use]
    pub fn logging(mut self, logging: LogConfig) -> Self {
        self.config.logging = logging;
        self
    }

    /// Returns the finished configuration.
    #[must_use]
    pub fn build(self) -> TelemetryConfig {
        self.config
    }
}
