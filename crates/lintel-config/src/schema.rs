//! Configuration sections.

use lintel_telemetry::LogFormat;
use serde::{Deserialize, Serialize};

/// `[interceptors]`: what a configuration pass discovers.
///
/// # Example
///
/// ```
/// use lintel_config::InterceptorsConfig;
///
/// let section: InterceptorsConfig = toml::from_str(r#"
///     namespace = "app::interceptors"
///     application = ["app::audit::AuditTrail"]
/// "#).unwrap();
///
/// assert_eq!(section.namespace, "app::interceptors");
/// assert!(!section.restart);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct InterceptorsConfig {
    /// Namespace to scan. Empty skips scanning.
    #[serde(default)]
    pub namespace: String,

    /// Start a new registration epoch on the startup pass.
    #[serde(default)]
    pub restart: bool,

    /// Application-supplied interceptor type keys.
    #[serde(default)]
    pub application: Vec<String>,
}

/// `[logging]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive (e.g. "info" or "lintel_discovery=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Emit ANSI colors (pretty format only).
    #[serde(default)]
    pub ansi_enabled: bool,

    /// Include file and line in events.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::Json,
            ansi_enabled: false,
            include_location: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// `[metrics]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MetricsConfig {
    /// Install the Prometheus recorder.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// `[reload]`: hot reload on configuration file changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ReloadConfig {
    /// Watch the configuration file and re-run a pass on change.
    #[serde(default)]
    pub watch: bool,

    /// Changes to the same file within this window are coalesced.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            watch: false,
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let logging = LoggingConfig::default();
        assert!(logging.enabled);
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, LogFormat::Json);

        assert!(MetricsConfig::default().enabled);
        assert_eq!(ReloadConfig::default().debounce_ms, 500);
        assert!(InterceptorsConfig::default().namespace.is_empty());
    }

    #[test]
    fn test_partial_section_uses_defaults() {
        let logging: LoggingConfig = toml::from_str(r#"format = "pretty""#).unwrap();
        assert_eq!(logging.format, LogFormat::Pretty);
        assert_eq!(logging.level, "info");
        assert!(logging.enabled);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<ReloadConfig, _> = toml::from_str("watch = true\ninterval = 3");
        assert!(result.unwrap_err().to_string().contains("interval"));
    }
}
