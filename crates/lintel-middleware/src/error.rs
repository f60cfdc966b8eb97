//! Install errors.

use lintel_router::PatternError;
use thiserror::Error;

/// An install target refused an interceptor.
///
/// Unlike discovery problems this is fatal to a configuration pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstallError {
    /// One of the interceptor's patterns did not compile.
    #[error("invalid path pattern for interceptor '{interceptor}': {source}")]
    InvalidPattern {
        /// Name of the interceptor being installed.
        interceptor: String,
        /// The compilation error.
        #[source]
        source: PatternError,
    },

    /// The install target rejected the interceptor for another reason.
    #[error("install of interceptor '{interceptor}' rejected: {reason}")]
    Rejected {
        /// Name of the interceptor being installed.
        interceptor: String,
        /// Why the install was rejected.
        reason: String,
    },
}

impl InstallError {
    /// Creates an [`InstallError::Rejected`].
    pub fn rejected(interceptor: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            interceptor: interceptor.into(),
            reason: reason.into(),
        }
    }

    /// Returns the name of the interceptor that failed to install.
    #[must_use]
    pub fn interceptor(&self) -> &str {
        match self {
            Self::InvalidPattern { interceptor, .. } | Self::Rejected { interceptor, .. } => {
                interceptor
            }
        }
    }
}
