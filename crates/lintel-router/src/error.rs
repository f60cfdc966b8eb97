//! Pattern parsing errors.

use thiserror::Error;

/// Errors produced while compiling path patterns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// The pattern string was empty.
    #[error("path pattern must not be empty")]
    Empty,

    /// The pattern did not start with `/`.
    #[error("path pattern must start with '/': {pattern}")]
    MissingLeadingSlash {
        /// The offending pattern.
        pattern: String,
    },

    /// `**` was combined with other characters inside one segment.
    #[error("'**' must occupy a whole segment in pattern {pattern} (segment {segment:?})")]
    InvalidDoubleStar {
        /// The offending pattern.
        pattern: String,
        /// The offending segment.
        segment: String,
    },

    /// A matcher was built without any include pattern.
    #[error("at least one include pattern is required")]
    NoIncludePatterns,

    /// A wildcard segment failed to compile.
    #[error("invalid wildcard segment {segment:?}: {reason}")]
    InvalidWildcard {
        /// The offending segment.
        segment: String,
        /// Why compilation failed.
        reason: String,
    },
}
