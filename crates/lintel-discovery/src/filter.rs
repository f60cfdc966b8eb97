//! Candidate filtering.
//!
//! Rules are applied in order; the first that matches rejects the candidate:
//!
//! | # | Rule                                        | Rejection            |
//! |---|---------------------------------------------|----------------------|
//! | 1 | the type is abstract                        | `Abstract`           |
//! | 2 | the type is the fallback sentinel           | `Sentinel`           |
//! | 3 | the type declares no path patterns          | `MissingPatterns`    |
//! | 4 | the type has no factory (not an interceptor)| `NotAnInterceptor`   |
//!
//! Accepted candidates are instantiated once per pass.

use lintel_core::{
    InstantiationError, Interceptor, InterceptorType, MiddlewareDescriptor, TypeKey,
};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Why a candidate was not accepted.
///
/// Rejections are decisions, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    /// The type is abstract.
    Abstract,
    /// The type is the fallback sentinel, which only the fallback policy
    /// installs.
    Sentinel,
    /// The type declares no path patterns.
    MissingPatterns,
    /// The type does not satisfy the interceptor contract.
    NotAnInterceptor,
}

impl Rejection {
    /// Returns the label used in logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Abstract => "abstract",
            Self::Sentinel => "sentinel",
            Self::MissingPatterns => "missing_patterns",
            Self::NotAnInterceptor => "not_an_interceptor",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An accepted, instantiated candidate.
#[derive(Clone)]
pub struct Candidate {
    /// The descriptor to register.
    pub descriptor: MiddlewareDescriptor,
    /// The fresh instance to install.
    pub instance: Arc<dyn Interceptor>,
}

impl fmt::Debug for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Candidate")
            .field("descriptor", &self.descriptor)
            .field("instance", &self.instance.name())
            .finish()
    }
}

/// Outcome of filtering one type.
#[derive(Debug)]
pub enum Filtered {
    /// The type passed every rule and was instantiated.
    Accepted(Candidate),
    /// A rule rejected the type.
    Rejected(Rejection),
    /// The type passed every rule but its factory failed.
    Failed(InstantiationError),
}

/// Decides which types become interceptors.
#[derive(Debug, Clone)]
pub struct CandidateFilter {
    sentinel: TypeKey,
}

impl CandidateFilter {
    /// Creates a filter that treats `sentinel` as the fallback type.
    #[must_use]
    pub fn new(sentinel: TypeKey) -> Self {
        Self { sentinel }
    }

    /// Returns the sentinel key.
    #[must_use]
    pub fn sentinel(&self) -> &TypeKey {
        &self.sentinel
    }

    /// Applies the rules without instantiating.
    ///
    /// # Errors
    ///
    /// Returns the first rule that rejects `metadata`.
    pub fn check(&self, metadata: &InterceptorType) -> Result<(), Rejection> {
        self.check_rules(metadata, true)
    }

    /// Filters a scanned or application-supplied candidate.
    #[must_use]
    pub fn admit(&self, metadata: &InterceptorType) -> Filtered {
        self.admit_with(metadata, true)
    }

    /// Filters the fallback sentinel: every rule except the sentinel rule.
    #[must_use]
    pub fn admit_fallback(&self, metadata: &InterceptorType) -> Filtered {
        self.admit_with(metadata, false)
    }

    fn admit_with(&self, metadata: &InterceptorType, reject_sentinel: bool) -> Filtered {
        if let Err(rejection) = self.check_rules(metadata, reject_sentinel) {
            return Filtered::Rejected(rejection);
        }

        // Both are present: check_rules passed.
        let (Some(patterns), Some(result)) = (metadata.patterns(), metadata.instantiate()) else {
            return Filtered::Rejected(Rejection::NotAnInterceptor);
        };

        match result {
            Ok(instance) => Filtered::Accepted(Candidate {
                descriptor: MiddlewareDescriptor::new(metadata.key().clone(), patterns),
                instance,
            }),
            Err(err) => Filtered::Failed(err),
        }
    }

    fn check_rules(&self, metadata: &InterceptorType, reject_sentinel: bool) -> Result<(), Rejection> {
        if !metadata.is_concrete() {
            return Err(Rejection::Abstract);
        }
        if reject_sentinel && metadata.key() == &self.sentinel {
            return Err(Rejection::Sentinel);
        }
        if metadata.patterns().is_none() {
            return Err(Rejection::MissingPatterns);
        }
        if metadata.factory().is_none() {
            return Err(Rejection::NotAnInterceptor);
        }
        Ok(())
    }
}

impl Default for CandidateFilter {
    fn default() -> Self {
        Self::new(lintel_middleware::DefaultInterceptor::key())
    }
}
