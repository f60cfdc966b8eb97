//! Probe interceptors and ready-made registry entries.
//!
//! Each constructor produces an [`InterceptorType`] that lands in one
//! filter outcome, so discovery tests can assemble registries by intent:
//!
//! | Constructor         | Outcome                       |
//! |---------------------|-------------------------------|
//! | [`probe`]           | accepted                      |
//! | [`probe_all`]       | accepted, matches every path  |
//! | [`abstract_base`]   | rejected: abstract            |
//! | [`unannotated`]     | rejected: missing patterns    |
//! | [`not_interceptor`] | rejected: not an interceptor  |
//! | [`failing`]         | instantiation failure         |

use http::StatusCode;
use lintel_core::{
    BoxFuture, Flow, Interceptor, InterceptorContext, InterceptorType, PatternSpec, Request,
    Response, ResponseExt, TypeKey,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A pass-through interceptor with a fixed name.
///
/// The pipeline records it in the context trail like any other interceptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    name: &'static str,
}

impl Probe {
    /// Creates a probe named `name`.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl Interceptor for Probe {
    fn name(&self) -> &'static str {
        self.name
    }
}

/// An interceptor that answers every request itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blocking {
    name: &'static str,
    status: StatusCode,
}

impl Blocking {
    /// Creates an interceptor that responds with `status`.
    #[must_use]
    pub const fn new(name: &'static str, status: StatusCode) -> Self {
        Self { name, status }
    }
}

impl Interceptor for Blocking {
    fn name(&self) -> &'static str {
        self.name
    }

    fn pre_handle<'a>(
        &'a self,
        _ctx: &'a mut InterceptorContext,
        _request: &'a mut Request,
    ) -> BoxFuture<'a, Flow> {
        let status = self.status;
        Box::pin(async move { Flow::Respond(Response::text(status, "blocked")) })
    }
}

/// An accepted type whose factory builds a [`Probe`] named `name`.
pub fn probe<I, E>(key: &str, name: &'static str, include: I, exclude: E) -> InterceptorType
where
    I: IntoIterator,
    I::Item: Into<String>,
    E: IntoIterator,
    E::Item: Into<String>,
{
    InterceptorType::new(TypeKey::new(key))
        .with_patterns(PatternSpec::new(include, exclude))
        .with_factory(move || Ok(Arc::new(Probe::new(name)) as Arc<dyn Interceptor>))
}

/// An accepted type matching every path.
pub fn probe_all(key: &str, name: &'static str) -> InterceptorType {
    InterceptorType::new(TypeKey::new(key))
        .with_patterns(PatternSpec::match_all())
        .with_factory(move || Ok(Arc::new(Probe::new(name)) as Arc<dyn Interceptor>))
}

/// Like [`probe_all`], counting factory calls in `calls`.
pub fn counted(key: &str, name: &'static str, calls: Arc<AtomicUsize>) -> InterceptorType {
    InterceptorType::new(TypeKey::new(key))
        .with_patterns(PatternSpec::match_all())
        .with_factory(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(Probe::new(name)) as Arc<dyn Interceptor>)
        })
}

/// An accepted type whose factory builds a [`Blocking`] interceptor.
pub fn blocking(key: &str, name: &'static str, status: StatusCode) -> InterceptorType {
    InterceptorType::new(TypeKey::new(key))
        .with_patterns(PatternSpec::match_all())
        .with_factory(move || Ok(Arc::new(Blocking::new(name, status)) as Arc<dyn Interceptor>))
}

/// An abstract type that would otherwise be accepted.
pub fn abstract_base(key: &str) -> InterceptorType {
    InterceptorType::abstract_type(TypeKey::new(key))
        .with_patterns(PatternSpec::match_all())
        .with_factory(|| Ok(Arc::new(Probe::new("abstract")) as Arc<dyn Interceptor>))
}

/// A concrete interceptor type that declares no patterns.
pub fn unannotated(key: &str) -> InterceptorType {
    InterceptorType::new(TypeKey::new(key))
        .with_factory(|| Ok(Arc::new(Probe::new("unannotated")) as Arc<dyn Interceptor>))
}

/// A type with patterns but no factory.
pub fn not_interceptor(key: &str) -> InterceptorType {
    InterceptorType::new(TypeKey::new(key)).with_patterns(PatternSpec::match_all())
}

/// An accepted type whose factory fails with `reason`.
pub fn failing(key: &str, reason: &'static str) -> InterceptorType {
    InterceptorType::new(TypeKey::new(key))
        .with_patterns(PatternSpec::match_all())
        .with_factory(move || Err(reason.into()))
}
