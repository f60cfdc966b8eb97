//! The fallback sentinel.

use lintel_core::{Interceptor, InterceptorType, TypeKey};
use lintel_macros::interceptor;

/// Pass-through interceptor installed when a configuration pass would
/// otherwise leave the pipeline empty.
///
/// It applies to every path and does nothing besides appearing in the
/// context trail, which is how tests and diagnostics observe that the
/// fallback is live.
#[interceptor(include = "/**")]
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultInterceptor;

impl DefaultInterceptor {
    /// Name reported in logs and the context trail.
    pub const NAME: &'static str = "default";

    /// Returns the sentinel's type key.
    #[must_use]
    pub fn key() -> TypeKey {
        TypeKey::of::<Self>()
    }

    /// Returns the sentinel's registry metadata.
    #[must_use]
    pub fn metadata() -> InterceptorType {
        InterceptorType::declared::<Self>()
    }
}

impl Interceptor for DefaultInterceptor {
    fn name(&self) -> &'static str {
        Self::NAME
    }
}
