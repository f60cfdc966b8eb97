//! Test error types.

use thiserror::Error;

/// Errors raised by the fixtures.
#[derive(Debug, Error)]
pub enum TestError {
    /// Request building failed.
    #[error("request build error: {0}")]
    RequestBuild(String),

    /// Header name or value is invalid.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// Response body reading failed.
    #[error("body read error: {0}")]
    BodyRead(String),
}
