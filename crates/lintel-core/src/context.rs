//! Per-request interceptor context.

use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// A unique identifier for each request, using UUID v7.
///
/// # Example
///
/// ```
/// use lintel_core::RequestId;
///
/// let id = RequestId::new();
/// assert_eq!(id.as_uuid().get_version_num(), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new time-ordered request ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `RequestId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// State that flows through the interceptor hooks of one request.
///
/// The pipeline records the name of every interceptor whose `pre_handle`
/// ran, in order; see [`InterceptorContext::trail`].
#[derive(Debug)]
pub struct InterceptorContext {
    request_id: RequestId,
    started_at: Instant,
    trail: Vec<&'static str>,
    extensions: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl InterceptorContext {
    /// Creates a context with a fresh request ID.
    #[must_use]
    pub fn new() -> Self {
        Self::with_request_id(RequestId::new())
    }

    /// Creates a context with a specific request ID.
    #[must_use]
    pub fn with_request_id(request_id: RequestId) -> Self {
        Self {
            request_id,
            started_at: Instant::now(),
            trail: Vec::new(),
            extensions: HashMap::new(),
        }
    }

    /// Returns the request ID.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Replaces the request ID.
    pub fn set_request_id(&mut self, request_id: RequestId) {
        self.request_id = request_id;
    }

    /// Returns when the context was created.
    #[must_use]
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Returns the time elapsed since the context was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Records that an interceptor ran.
    pub fn record(&mut self, interceptor: &'static str) {
        self.trail.push(interceptor);
    }

    /// Names of the interceptors that ran, in execution order.
    #[must_use]
    pub fn trail(&self) -> &[&'static str] {
        &self.trail
    }

    /// Returns true if `interceptor` ran for this request.
    #[must_use]
    pub fn visited(&self, interceptor: &str) -> bool {
        self.trail.iter().any(|name| *name == interceptor)
    }

    /// Stores a typed extension value, replacing any previous value of `T`.
    ///
    /// # Example
    ///
    /// ```
    /// use lintel_core::InterceptorContext;
    ///
    /// struct Tenant(&'static str);
    ///
    /// let mut ctx = InterceptorContext::new();
    /// ctx.set_extension(Tenant("acme"));
    /// assert_eq!(ctx.get_extension::<Tenant>().unwrap().0, "acme");
    /// ```
    pub fn set_extension<T: Send + Sync + 'static>(&mut self, value: T) {
        self.extensions.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Retrieves a typed extension value.
    #[must_use]
    pub fn get_extension<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<T>())
    }

    /// Removes and returns a typed extension value.
    pub fn take_extension<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.extensions
            .remove(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast::<T>().ok())
            .map(|boxed| *boxed)
    }
}

impl Default for InterceptorContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_unique() {
        assert_ne!(RequestId::new(), RequestId::new());
    }

    #[test]
    fn test_request_id_display() {
        let uuid = Uuid::now_v7();
        assert_eq!(RequestId::from_uuid(uuid).to_string(), uuid.to_string());
    }

    #[test]
    fn test_trail() {
        let mut ctx = InterceptorContext::new();
        assert!(ctx.trail().is_empty());

        ctx.record("auth");
        ctx.record("audit");
        assert_eq!(ctx.trail(), ["auth", "audit"]);
        assert!(ctx.visited("auth"));
        assert!(!ctx.visited("timing"));
    }

    #[test]
    fn test_extensions() {
        #[derive(Debug, PartialEq)]
        struct Quota(u32);

        let mut ctx = InterceptorContext::new();
        assert!(ctx.get_extension::<Quota>().is_none());

        ctx.set_extension(Quota(10));
        ctx.set_extension(Quota(5));
        assert_eq!(ctx.get_extension::<Quota>(), Some(&Quota(5)));

        assert_eq!(ctx.take_extension::<Quota>(), Some(Quota(5)));
        assert!(ctx.get_extension::<Quota>().is_none());
    }

    #[test]
    fn test_with_request_id() {
        let id = RequestId::new();
        let mut ctx = InterceptorContext::with_request_id(id);
        assert_eq!(ctx.request_id(), id);

        let other = RequestId::new();
        ctx.set_request_id(other);
        assert_eq!(ctx.request_id(), other);
    }
}
