//! Discovery error types.
//!
//! Only [`EngineError`] aborts a configuration pass. [`DiscoveryError`] and
//! [`ResolutionError`] are recovered by the engine and reported in the
//! pass report.

use lintel_core::{KeyError, TypeKey};
use lintel_middleware::InstallError;
use thiserror::Error;

/// A namespace scan failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    /// The namespace is not a `::`-separated identifier path.
    #[error("invalid namespace '{namespace}': {source}")]
    InvalidNamespace {
        /// The namespace as configured.
        namespace: String,
        /// What is wrong with it.
        #[source]
        source: KeyError,
    },

    /// The scanner could not enumerate the namespace.
    #[error("failed to scan namespace '{namespace}': {reason}")]
    Unavailable {
        /// The namespace being scanned.
        namespace: String,
        /// Why the scan failed.
        reason: String,
    },
}

impl DiscoveryError {
    /// Creates a [`DiscoveryError::Unavailable`].
    pub fn unavailable(namespace: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            namespace: namespace.into(),
            reason: reason.into(),
        }
    }

    /// Returns the namespace the error concerns.
    #[must_use]
    pub fn namespace(&self) -> &str {
        match self {
            Self::InvalidNamespace { namespace, .. } | Self::Unavailable { namespace, .. } => {
                namespace
            }
        }
    }
}

/// A scanned key did not resolve to type metadata.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// No type is registered under the key.
    #[error("no interceptor type registered as '{key}'")]
    UnknownType {
        /// The unresolved key.
        key: TypeKey,
    },
}

/// A configuration pass failed.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The install target refused an accepted interceptor.
    #[error("failed to install interceptor '{key}'")]
    Install {
        /// Key of the interceptor that failed to install.
        key: TypeKey,
        /// The install target's error.
        #[source]
        source: InstallError,
    },
}

impl EngineError {
    /// Returns the key of the interceptor concerned.
    #[must_use]
    pub fn key(&self) -> &TypeKey {
        match self {
            Self::Install { key, .. } => key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_discovery_error_display() {
        let err = DiscoveryError::unavailable("app::interceptors", "module index missing");
        assert_eq!(err.namespace(), "app::interceptors");
        assert_eq!(
            err.to_string(),
            "failed to scan namespace 'app::interceptors': module index missing"
        );

        let err = DiscoveryError::InvalidNamespace {
            namespace: "app::::x".to_string(),
            source: KeyError::Malformed {
                path: "app::::x".to_string(),
            },
        };
        assert!(err.to_string().starts_with("invalid namespace 'app::::x'"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_resolution_error_display() {
        let err = ResolutionError::UnknownType {
            key: TypeKey::new("app::Gone"),
        };
        assert_eq!(
            err.to_string(),
            "no interceptor type registered as 'app::Gone'"
        );
    }

    #[test]
    fn test_engine_error_source() {
        let err = EngineError::Install {
            key: TypeKey::new("app::B"),
            source: InstallError::rejected("b", "sealed"),
        };
        assert_eq!(err.key().as_str(), "app::B");
        assert_eq!(err.to_string(), "failed to install interceptor 'app::B'");
        assert!(err.source().unwrap().to_string().contains("sealed"));
    }
}
