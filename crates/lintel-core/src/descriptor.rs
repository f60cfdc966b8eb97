//! Descriptors of accepted candidates.

use crate::key::TypeKey;
use crate::patterns::PatternSpec;
use serde::Serialize;

/// An interceptor type that passed filtering, with its resolved patterns.
///
/// Descriptors are immutable; the registration ledger stores them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MiddlewareDescriptor {
    key: TypeKey,
    include: Vec<String>,
    exclude: Vec<String>,
}

impl MiddlewareDescriptor {
    /// Creates a descriptor for `key` from its declared patterns.
    #[must_use]
    pub fn new(key: TypeKey, patterns: &PatternSpec) -> Self {
        Self {
            key,
            include: patterns.include().to_vec(),
            exclude: patterns.exclude().to_vec(),
        }
    }

    /// Returns the type key.
    #[must_use]
    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    /// Returns the include patterns.
    #[must_use]
    pub fn include(&self) -> &[String] {
        &self.include
    }

    /// Returns the exclude patterns.
    #[must_use]
    pub fn exclude(&self) -> &[String] {
        &self.exclude
    }
}
