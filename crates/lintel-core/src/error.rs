//! Error types for interceptor metadata.

use crate::key::TypeKey;
use thiserror::Error;

/// A type-erased error returned by interceptor factories.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A malformed [`TypeKey`] or namespace path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// The path was empty.
    #[error("type path must not be empty")]
    Empty,

    /// The path contained an empty segment or a non-identifier character.
    #[error("malformed type path '{path}'")]
    Malformed {
        /// The offending path.
        path: String,
    },
}

/// A factory failed to produce an interceptor instance.
///
/// Discovery recovers from this: the candidate is skipped and the pass
/// continues.
#[derive(Debug, Error)]
#[error("failed to instantiate interceptor '{key}': {source}")]
pub struct InstantiationError {
    key: TypeKey,
    #[source]
    source: BoxError,
}

impl InstantiationError {
    /// Creates an instantiation error for `key`.
    pub fn new(key: TypeKey, source: impl Into<BoxError>) -> Self {
        Self {
            key,
            source: source.into(),
        }
    }

    /// Returns the key of the type that failed to instantiate.
    #[must_use]
    pub fn key(&self) -> &TypeKey {
        &self.key
    }
}
