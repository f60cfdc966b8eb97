//! Procedural macros for Lintel interceptors.
//!
//! # Overview
//!
//! The `#[interceptor]` attribute declares which request paths an
//! interceptor type applies to. It leaves the annotated item untouched and
//! adds an implementation of `lintel_core::DeclaredPatterns`, which
//! `InterceptorType::declared::<T>()` reads when the type is registered for
//! discovery.
//!
//! # Example
//!
//! ```rust,ignore
//! use lintel::prelude::*;
//!
//! #[derive(Default)]
//! #[lintel::interceptor(include = "/api/**", exclude = ["/api/health", "/api/ready"])]
//! struct AuditTrail;
//!
//! impl Interceptor for AuditTrail {
//!     fn name(&self) -> &'static str {
//!         "audit_trail"
//!     }
//! }
//!
//! let registry = TypeRegistry::new().with(InterceptorType::declared::<AuditTrail>());
//! ```

mod interceptor;
mod parse;

use proc_macro::TokenStream;

/// Declares the path patterns of an interceptor type.
///
/// # Attributes
///
/// - `include`: glob pattern(s) the interceptor applies to; defaults to `/**`
/// - `exclude`: glob pattern(s) removed from the include set
///
/// Each key takes a string literal or an array of string literals and may be
/// repeated. Patterns must start with `/`; anything else is a compile error.
///
/// # Generated Code
///
/// ```rust,ignore
/// impl ::lintel_core::DeclaredPatterns for AuditTrail {
///     fn patterns() -> ::lintel_core::PatternSpec {
///         let include: &[&str] = &["/api/**"];
///         let exclude: &[&str] = &["/api/health", "/api/ready"];
///         ::lintel_core::PatternSpec::new(include.iter().copied(), exclude.iter().copied())
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn interceptor(attr: TokenStream, item: TokenStream) -> TokenStream {
    interceptor::expand_interceptor(attr.into(), item.into())
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
