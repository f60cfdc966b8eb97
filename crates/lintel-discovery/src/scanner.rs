//! Namespace scanning.

use crate::error::DiscoveryError;
use crate::registry::TypeRegistry;
use lintel_core::{is_valid_path, KeyError, TypeKey};
use std::sync::Arc;

/// Enumerates candidate interceptor types under a namespace.
///
/// A namespace is a `::`-separated module path. Implementations return keys
/// in a stable order; install order follows it.
pub trait Scanner: Send + Sync {
    /// Returns the keys of every type under `namespace`.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError`] if the namespace is malformed or cannot be
    /// enumerated. The engine treats this as an empty scan.
    fn scan(&self, namespace: &str) -> Result<Vec<TypeKey>, DiscoveryError>;
}

/// Scanner over a [`TypeRegistry`].
///
/// Returns every registered key whose module path is `namespace` or nested
/// below it, in registration order: `a::b` yields `a::b::X` and `a::b::c::Y`
/// but not `a::bc::Z`.
#[derive(Debug, Clone)]
pub struct RegistryScanner {
    registry: Arc<TypeRegistry>,
}

impl RegistryScanner {
    /// Creates a scanner over `registry`.
    #[must_use]
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }

    /// Returns the scanned registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }
}

impl Scanner for RegistryScanner {
    fn scan(&self, namespace: &str) -> Result<Vec<TypeKey>, DiscoveryError> {
        validate_namespace(namespace)?;

        Ok(self
            .registry
            .keys()
            .filter(|key| key.is_within(namespace))
            .cloned()
            .collect())
    }
}

/// Checks that `namespace` is a well-formed module path.
///
/// # Errors
///
/// Returns [`DiscoveryError::InvalidNamespace`] otherwise.
pub fn validate_namespace(namespace: &str) -> Result<(), DiscoveryError> {
    if namespace.is_empty() {
        return Err(DiscoveryError::InvalidNamespace {
            namespace: String::new(),
            source: KeyError::Empty,
        });
    }
    if !is_valid_path(namespace) {
        return Err(DiscoveryError::InvalidNamespace {
            namespace: namespace.to_string(),
            source: KeyError::Malformed {
                path: namespace.to_string(),
            },
        });
    }
    Ok(())
}
