//! Layered configuration loading.

use std::env;
use std::fs;
use std::path::Path;

use lintel_telemetry::LogFormat;

use crate::{ConfigError, LintelConfig};

/// Loads a [`LintelConfig`] in layers, later layers overriding earlier ones:
///
/// 1. defaults or a preset
/// 2. a TOML or JSON file (or string)
/// 3. environment variables `PREFIX__SECTION__KEY`
///
/// A file replaces the whole configuration; sections it omits take their
/// defaults.
///
/// # Example
///
/// ```no_run
/// use lintel_config::ConfigLoader;
///
/// # fn main() -> Result<(), lintel_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_defaults()
///     .with_optional_file("lintel.toml")?
///     .with_env_prefix("LINTEL")
///     .load()?;
///
/// println!("scanning {}", config.interceptors.namespace);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: LintelConfig,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a loader starting from defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: LintelConfig::default(),
            env_prefix: None,
        }
    }

    /// Reset to default values.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = LintelConfig::default();
        self
    }

    /// Start from the development preset.
    ///
    /// ```
    /// use lintel_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new().with_development().load().unwrap();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = LintelConfig::development();
        self
    }

    /// Start from the production preset.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = LintelConfig::production();
        self
    }

    /// Load a `.toml` or `.json` file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing or unreadable, has an
    /// unsupported extension, or does not parse (unknown fields included).
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        self.config = parse_file(&content, path)?;
        Ok(self)
    }

    /// Load a file if it exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but fails to load.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from a string in `format` ("toml" or "json").
    ///
    /// ```
    /// use lintel_config::ConfigLoader;
    ///
    /// let toml = r#"
    ///     [interceptors]
    ///     namespace = "app::interceptors"
    /// "#;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string(toml, "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.interceptors.namespace, "app::interceptors");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if parsing fails or the format is unknown.
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = parse_str(content, &format.to_lowercase())?;
        Ok(self)
    }

    /// Apply environment overrides `PREFIX__SECTION__KEY` on load.
    ///
    /// For example, with prefix `LINTEL`:
    /// - `LINTEL__INTERCEPTORS__NAMESPACE=app::interceptors`
    /// - `LINTEL__INTERCEPTORS__APPLICATION=app::A, app::B`
    /// - `LINTEL__LOGGING__LEVEL=debug`
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Load variables from a `.env` file in the working directory, if any.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a `.env` file exists but cannot be parsed.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(ConfigError::env_parse_error(".env", e.to_string())),
        }
    }

    /// Apply environment overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an override does not parse or validation
    /// fails.
    pub fn load(self) -> Result<LintelConfig, ConfigError> {
        let config = self.load_unvalidated()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides without validating.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an override does not parse.
    pub fn load_unvalidated(mut self) -> Result<LintelConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_overrides(&prefix)?;
        }
        Ok(self.config)
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        let marker = format!("{prefix}__");
        let mut vars: Vec<(String, String)> =
            env::vars().filter(|(k, _)| k.starts_with(&marker)).collect();
        vars.sort();

        for (key, value) in vars {
            self.apply_env_var(&key, &value, prefix)?;
        }
        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let path = key
            .strip_prefix(prefix)
            .and_then(|k| k.strip_prefix("__"))
            .ok_or_else(|| ConfigError::env_parse_error(key, "invalid key format"))?;

        let parts: Vec<&str> = path.split("__").collect();
        let config = &mut self.config;

        match parts.as_slice() {
            ["INTERCEPTORS", "NAMESPACE"] => {
                config.interceptors.namespace = value.trim().to_string();
            }
            ["INTERCEPTORS", "RESTART"] => {
                config.interceptors.restart = bool_var(key, value)?;
            }
            ["INTERCEPTORS", "APPLICATION"] => {
                config.interceptors.application = value
                    .split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(ToString::to_string)
                    .collect();
            }

            ["LOGGING", "ENABLED"] => {
                config.logging.enabled = bool_var(key, value)?;
            }
            ["LOGGING", "LEVEL"] => {
                config.logging.level = value.to_string();
            }
            ["LOGGING", "FORMAT"] => {
                config.logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => {
                        return Err(ConfigError::env_parse_error(
                            key,
                            "expected 'json' or 'pretty'",
                        ))
                    }
                };
            }
            ["LOGGING", "ANSI_ENABLED"] => {
                config.logging.ansi_enabled = bool_var(key, value)?;
            }
            ["LOGGING", "INCLUDE_LOCATION"] => {
                config.logging.include_location = bool_var(key, value)?;
            }

            ["METRICS", "ENABLED"] => {
                config.metrics.enabled = bool_var(key, value)?;
            }

            ["RELOAD", "WATCH"] => {
                config.reload.watch = bool_var(key, value)?;
            }
            ["RELOAD", "DEBOUNCE_MS"] => {
                config.reload.debounce_ms = value
                    .parse()
                    .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))?;
            }

            // Unknown keys are ignored so unrelated variables sharing the
            // prefix do not break startup.
            _ => {}
        }

        Ok(())
    }
}

fn parse_file(content: &str, path: &Path) -> Result<LintelConfig, ConfigError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    match extension.as_deref() {
        Some(format @ ("toml" | "json")) => parse_str(content, format),
        _ => Err(ConfigError::UnsupportedFormat {
            format: path.display().to_string(),
        }),
    }
}

fn parse_str(content: &str, format: &str) -> Result<LintelConfig, ConfigError> {
    match format {
        "toml" => Ok(toml::from_str(content)?),
        "json" => Ok(serde_json::from_str(content)?),
        other => Err(ConfigError::UnsupportedFormat {
            format: other.to_string(),
        }),
    }
}

fn bool_var(key: &str, value: &str) -> Result<bool, ConfigError> {
    parse_bool(value).ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
