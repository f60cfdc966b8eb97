//! Typed configuration for Lintel.
//!
//! - TOML and JSON files, strict (unknown fields are errors)
//! - layered loading: defaults or preset, then file, then environment
//! - validation of the namespace, application keys, log level and reload
//!   settings
//! - a debounced [`FileWatcher`] for hot reload
//!
//! # Configuration File Format
//!
//! ```toml
//! [interceptors]
//! namespace = "app::interceptors"   # empty skips scanning
//! restart = false
//! application = ["app::audit::AuditTrail"]
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//! ansi_enabled = false
//! include_location = false
//!
//! [metrics]
//! enabled = true
//!
//! [reload]
//! watch = false
//! debounce_ms = 500
//! ```
//!
//! # Environment Variable Overrides
//!
//! `PREFIX__SECTION__KEY`, for example:
//!
//! - `LINTEL__INTERCEPTORS__NAMESPACE=app::interceptors`
//! - `LINTEL__INTERCEPTORS__APPLICATION=app::A,app::B`
//! - `LINTEL__RELOAD__WATCH=true`

#![doc(html_root_url = "https://docs.rs/lintel-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;
mod watcher;

pub use config::{LintelConfig, LintelConfigBuilder};
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{InterceptorsConfig, LoggingConfig, MetricsConfig, ReloadConfig};
pub use watcher::{
    FileChangeEvent, FileChangeKind, FileWatcher, FileWatcherBuilder, FileWatcherConfig,
};
