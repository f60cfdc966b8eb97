//! Compile-time type registry.
//!
//! Rust has no runtime reflection over modules, so the set of interceptor
//! types a namespace can yield is declared up front: the application builds a
//! [`TypeRegistry`] from an explicit list, and scanning walks it.

use crate::error::ResolutionError;
use indexmap::IndexMap;
use lintel_core::{InterceptorType, TypeKey};

/// Ordered map from [`TypeKey`] to [`InterceptorType`].
///
/// Iteration order is registration order, which is also the order a
/// [`RegistryScanner`](crate::RegistryScanner) returns keys in.
///
/// # Example
///
/// ```
/// use lintel_core::{InterceptorType, PatternSpec, TypeKey};
/// use lintel_discovery::TypeRegistry;
///
/// let registry = TypeRegistry::new()
///     .with(InterceptorType::abstract_type(TypeKey::new("app::Base")))
///     .with(
///         InterceptorType::new(TypeKey::new("app::Audit"))
///             .with_patterns(PatternSpec::match_all()),
///     );
///
/// assert_eq!(registry.len(), 2);
/// assert!(registry.resolve(&TypeKey::new("app::Audit")).is_ok());
/// assert!(registry.resolve(&TypeKey::new("app::Missing")).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: IndexMap<TypeKey, InterceptorType>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type, returning the metadata it replaced.
    ///
    /// Re-registering a key keeps its original position.
    pub fn register(&mut self, metadata: InterceptorType) -> Option<InterceptorType> {
        self.types.insert(metadata.key().clone(), metadata)
    }

    /// Registers a type (builder form).
    #[must_use]
    pub fn with(mut self, metadata: InterceptorType) -> Self {
        self.register(metadata);
        self
    }

    /// Resolves a key to its metadata.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::UnknownType`] if nothing is registered
    /// under `key`.
    pub fn resolve(&self, key: &TypeKey) -> Result<&InterceptorType, ResolutionError> {
        self.types
            .get(key)
            .ok_or_else(|| ResolutionError::UnknownType { key: key.clone() })
    }

    /// Returns true if `key` is registered.
    #[must_use]
    pub fn contains(&self, key: &TypeKey) -> bool {
        self.types.contains_key(key)
    }

    /// Iterates over registered keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &TypeKey> {
        self.types.keys()
    }

    /// Iterates over registered metadata in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &InterceptorType> {
        self.types.values()
    }

    /// Returns the number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl FromIterator<InterceptorType> for TypeRegistry {
    fn from_iter<I: IntoIterator<Item = InterceptorType>>(iter: I) -> Self {
        let mut registry = Self::new();
        for metadata in iter {
            registry.register(metadata);
        }
        registry
    }
}
