//! Root configuration type.

use lintel_core::TypeKey;
use lintel_discovery::{validate_namespace, PassConfig};
use lintel_telemetry::logging::create_env_filter;
use lintel_telemetry::{LogConfig, LogFormat, TelemetryConfig};
use serde::{Deserialize, Serialize};

use crate::{ConfigError, InterceptorsConfig, LoggingConfig, MetricsConfig, ReloadConfig};

/// Complete Lintel configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use lintel_config::LintelConfig;
///
/// let config = LintelConfig::default();
/// assert!(config.interceptors.namespace.is_empty());
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct LintelConfig {
    /// Interceptor discovery.
    #[serde(default)]
    pub interceptors: InterceptorsConfig,

    /// Logging.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Metrics.
    #[serde(default)]
    pub metrics: MetricsConfig,

    /// Hot reload.
    #[serde(default)]
    pub reload: ReloadConfig,
}

impl LintelConfig {
    /// Create a configuration builder.
    #[must_use]
    pub fn builder() -> LintelConfigBuilder {
        LintelConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if:
    /// - the namespace is not blank and not a `::`-separated path
    /// - an application key is blank or malformed
    /// - the log level is not a valid filter directive
    /// - the reload debounce is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        let namespace = self.interceptors.namespace.trim();
        if !namespace.is_empty() {
            validate_namespace(namespace).map_err(|e| {
                ConfigError::invalid_value("interceptors.namespace", e.to_string())
            })?;
        }

        for (i, key) in self.interceptors.application.iter().enumerate() {
            TypeKey::parse(key.trim()).map_err(|e| {
                ConfigError::invalid_value(format!("interceptors.application[{i}]"), e.to_string())
            })?;
        }

        if self.logging.enabled {
            create_env_filter(&self.logging.level)
                .map_err(|e| ConfigError::invalid_value("logging.level", e.to_string()))?;
        }

        if self.reload.debounce_ms == 0 {
            return Err(ConfigError::invalid_value(
                "reload.debounce_ms",
                "must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Builds the input of a configuration pass.
    ///
    /// A blank namespace skips scanning.
    #[must_use]
    pub fn pass_config(&self, restart: bool) -> PassConfig {
        let namespace = self.interceptors.namespace.trim();
        PassConfig {
            namespace: (!namespace.is_empty()).then(|| namespace.to_string()),
            restart,
            application: self
                .interceptors
                .application
                .iter()
                .map(|key| TypeKey::new(key.trim()))
                .collect(),
        }
    }

    /// The startup pass: [`pass_config`](Self::pass_config) with the
    /// configured restart flag.
    #[must_use]
    pub fn startup_pass(&self) -> PassConfig {
        self.pass_config(self.interceptors.restart)
    }

    /// Converts the logging and metrics sections for `lintel-telemetry`.
    #[must_use]
    pub fn telemetry_config(&self) -> TelemetryConfig {
        let logging = LogConfig {
            enabled: self.logging.enabled,
            level: self.logging.level.clone(),
            format: self.logging.format,
            ansi: self.logging.ansi_enabled,
            include_location: self.logging.include_location,
            include_target: true,
        };

        TelemetryConfig::builder()
            .logging(logging)
            .metrics_enabled(self.metrics.enabled)
            .build()
    }

    /// Local development preset: pretty debug logs.
    ///
    /// # Example
    ///
    /// ```
    /// use lintel_config::LintelConfig;
    ///
    /// let config = LintelConfig::development();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.ansi_enabled = true;
        config.logging.include_location = true;
        config
    }

    /// Production preset: JSON logs at info level.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();
        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config.logging.ansi_enabled = false;
        config.metrics.enabled = true;
        config
    }
}

/// Builder for [`LintelConfig`].
#[derive(Debug, Default)]
pub struct LintelConfigBuilder {
    interceptors: Option<InterceptorsConfig>,
    logging: Option<LoggingConfig>,
    metrics: Option<MetricsConfig>,
    reload: Option<ReloadConfig>,
}

impl LintelConfigBuilder {
    /// Create a builder; unset sections use their defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the interceptors section.
    #[must_use]
    pub fn interceptors(mut self, interceptors: InterceptorsConfig) -> Self {
        self.interceptors = Some(interceptors);
        self
    }

    /// Set the namespace to scan.
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.interceptors
            .get_or_insert_with(InterceptorsConfig::default)
            .namespace = namespace.into();
        self
    }

    /// Append an application-supplied interceptor key.
    #[must_use]
    pub fn application(mut self, key: impl Into<String>) -> Self {
        self.interceptors
            .get_or_insert_with(InterceptorsConfig::default)
            .application
            .push(key.into());
        self
    }

    /// Set the logging section.
    #[must_use]
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Set the metrics section.
    #[must_use]
    pub fn metrics(mut self, metrics: MetricsConfig) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Set the reload section.
    #[must_use]
    pub fn reload(mut self, reload: ReloadConfig) -> Self {
        self.reload = Some(reload);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> LintelConfig {
        LintelConfig {
            interceptors: self.interceptors.unwrap_or_default(),
            logging: self.logging.unwrap_or_default(),
            metrics: self.metrics.unwrap_or_default(),
            reload: self.reload.unwrap_or_default(),
        }
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<LintelConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = LintelConfig::builder()
            .namespace("app::interceptors")
            .application("app::audit::AuditTrail")
            .build();

        assert_eq!(config.interceptors.namespace, "app::interceptors");
        assert_eq!(config.interceptors.application, ["app::audit::AuditTrail"]);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_validate_namespace() {
        let config = LintelConfig::builder().namespace("app::::x").build();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("interceptors.namespace"));

        // Blank means "skip scanning".
        assert!(LintelConfig::builder()
            .namespace("   ")
            .build_validated()
            .is_ok());
    }

    #[test]
    fn test_validate_application_keys() {
        let err = LintelConfig::builder()
            .application("app::Ok")
            .application(" ")
            .build_validated()
            .unwrap_err();
        assert!(err.to_string().contains("interceptors.application[1]"));

        let err = LintelConfig::builder()
            .application("app::bad key")
            .build_validated()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_validate_log_level() {
        let mut config = LintelConfig::default();
        config.logging.level = "lintel=notalevel".to_string();
        assert!(config.validate().is_err());

        // Not checked when logging is off.
        config.logging.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_debounce() {
        let config = LintelConfig::builder()
            .reload(ReloadConfig {
                watch: true,
                debounce_ms: 0,
            })
            .build();
        assert!(config
            .validate()
            .unwrap_err()
            .to_string()
            .contains("reload.debounce_ms"));
    }

    #[test]
    fn test_pass_config() {
        let config = LintelConfig::builder()
            .namespace(" app::interceptors ")
            .application(" app::audit::AuditTrail ")
            .build();

        let pass = config.pass_config(true);
        assert_eq!(pass.namespace(), Some("app::interceptors"));
        assert!(pass.restart);
        assert_eq!(pass.application, [TypeKey::new("app::audit::AuditTrail")]);

        assert!(LintelConfig::default().startup_pass().namespace.is_none());
    }

    #[test]
    fn test_telemetry_config() {
        let telemetry = LintelConfig::development().telemetry_config();
        assert_eq!(telemetry.logging.level, "debug");
        assert_eq!(telemetry.logging.format, LogFormat::Pretty);
        assert!(telemetry.logging.ansi);
        assert!(telemetry.metrics.enabled);
    }

    #[test]
    fn test_presets_validate() {
        assert!(LintelConfig::development().validate().is_ok());
        assert!(LintelConfig::production().validate().is_ok());
    }
}
