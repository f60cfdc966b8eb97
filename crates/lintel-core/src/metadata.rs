//! Interceptor type metadata.
//!
//! Discovery never sees Rust types directly. Each interceptor type is
//! described by an [`InterceptorType`]: its key, whether it can be
//! instantiated, the patterns it declares, and a factory. The factory is the
//! capability check; a type without one does not satisfy the interceptor
//! contract.

use crate::error::{BoxError, InstantiationError};
use crate::interceptor::Interceptor;
use crate::key::TypeKey;
use crate::patterns::{DeclaredPatterns, PatternSpec};
use std::fmt;
use std::sync::Arc;

/// Creates a fresh interceptor instance.
pub type Factory = Arc<dyn Fn() -> Result<Arc<dyn Interceptor>, BoxError> + Send + Sync>;

/// Whether a type can be instantiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A concrete type.
    Concrete,
    /// An abstract type (a base or marker); never instantiated.
    Abstract,
}

/// Metadata describing one interceptor type.
///
/// # Example
///
/// ```
/// use lintel_core::{Interceptor, InterceptorType, PatternSpec, TypeKey};
///
/// #[derive(Default)]
/// struct Audit;
///
/// impl Interceptor for Audit {
///     fn name(&self) -> &'static str {
///         "audit"
///     }
/// }
///
/// let metadata = InterceptorType::of::<Audit>().with_patterns(PatternSpec::match_all());
/// let instance = metadata.instantiate().unwrap().unwrap();
/// assert_eq!(instance.name(), "audit");
/// ```
#[derive(Clone)]
pub struct InterceptorType {
    key: TypeKey,
    kind: TypeKind,
    patterns: Option<PatternSpec>,
    factory: Option<Factory>,
}

impl InterceptorType {
    /// Creates metadata for a concrete type with no patterns and no factory.
    #[must_use]
    pub fn new(key: TypeKey) -> Self {
        Self {
            key,
            kind: TypeKind::Concrete,
            patterns: None,
            factory: None,
        }
    }

    /// Creates metadata for an abstract type.
    #[must_use]
    pub fn abstract_type(key: TypeKey) -> Self {
        Self {
            kind: TypeKind::Abstract,
            ..Self::new(key)
        }
    }

    /// Metadata for `T` built from `T::default()`, without declared patterns.
    #[must_use]
    pub fn of<T>() -> Self
    where
        T: Interceptor + Default,
    {
        Self::new(TypeKey::of::<T>())
            .with_factory(|| Ok(Arc::new(T::default()) as Arc<dyn Interceptor>))
    }

    /// Metadata for `T` with the patterns `T` declares.
    #[must_use]
    pub fn declared<T>() -> Self
    where
        T: Interceptor + Default + DeclaredPatterns,
    {
        Self::of::<T>().with_patterns(T::patterns())
    }

    /// Sets the declared patterns.
    #[must_use]
    pub fn with_patterns(mut self, patterns: PatternSpec) -> Self {
        self.patterns = Some(patterns);
        self
    }

    /// Sets the factory.
    #[must_use]
    pub fn with_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn Interceptor>, BoxError> + Send + Sync + 'static,
    {
        self.factory = Some(Arc::new(factory));
        self
    }

    /// Sets the type kind.
    #[must_use]
    pub fn with_kind(mut self, kind: TypeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Returns the type key.
    #[must_use]
    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    /// Returns the type kind.
    #[must_use]
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Returns true for concrete types.
    #[must_use]
    pub fn is_concrete(&self) -> bool {
        self.kind == TypeKind::Concrete
    }

    /// Returns the declared patterns, if any.
    #[must_use]
    pub fn patterns(&self) -> Option<&PatternSpec> {
        self.patterns.as_ref()
    }

    /// Returns the factory, if the type satisfies the interceptor contract.
    #[must_use]
    pub fn factory(&self) -> Option<&Factory> {
        self.factory.as_ref()
    }

    /// Calls the factory once.
    ///
    /// Returns `None` if the type has no factory.
    pub fn instantiate(&self) -> Option<Result<Arc<dyn Interceptor>, InstantiationError>> {
        self.factory.as_ref().map(|factory| {
            factory().map_err(|source| InstantiationError::new(self.key.clone(), source))
        })
    }
}

impl fmt::Debug for InterceptorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorType")
            .field("key", &self.key)
            .field("kind", &self.kind)
            .field("patterns", &self.patterns)
            .field("factory", &self.factory.as_ref().map(|_| ".."))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Noop;

    impl Interceptor for Noop {
        fn name(&self) -> &'static str {
            "noop"
        }
    }

    impl DeclaredPatterns for Noop {
        fn patterns() -> PatternSpec {
            PatternSpec::including(["/noop/**"])
        }
    }

    #[test]
    fn test_new_is_bare_concrete() {
        let metadata = InterceptorType::new(TypeKey::new("app::Bare"));
        assert_eq!(metadata.kind(), TypeKind::Concrete);
        assert!(metadata.patterns().is_none());
        assert!(metadata.factory().is_none());
        assert!(metadata.instantiate().is_none());
    }

    #[test]
    fn test_abstract_type() {
        let metadata = InterceptorType::abstract_type(TypeKey::new("app::Base"));
        assert!(!metadata.is_concrete());
        assert_eq!(
            metadata.with_kind(TypeKind::Concrete).kind(),
            TypeKind::Concrete
        );
    }

    #[test]
    fn test_declared() {
        let metadata = InterceptorType::declared::<Noop>();
        assert_eq!(metadata.key(), &TypeKey::of::<Noop>());
        assert_eq!(metadata.patterns().unwrap().include(), ["/noop/**"]);
        assert!(metadata.factory().is_some());
    }

    #[test]
    fn test_instantiate_calls_factory_each_time() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let metadata = InterceptorType::new(TypeKey::new("app::Counted")).with_factory(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(Noop) as Arc<dyn Interceptor>)
        });

        assert!(metadata.instantiate().unwrap().is_ok());
        assert!(metadata.instantiate().unwrap().is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_instantiate_failure() {
        let metadata = InterceptorType::new(TypeKey::new("app::Broken"))
            .with_factory(|| Err("no database".into()));

        let err = metadata.instantiate().unwrap().err().unwrap();
        assert_eq!(err.key().as_str(), "app::Broken");
        assert!(err.to_string().contains("no database"));
    }

    #[test]
    fn test_debug_hides_factory() {
        let metadata = InterceptorType::of::<Noop>();
        let debug = format!("{metadata:?}");
        assert!(debug.contains("InterceptorType"));
        assert!(debug.contains("\"..\""));
    }
}
