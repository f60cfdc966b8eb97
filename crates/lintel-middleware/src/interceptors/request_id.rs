//! Request ID propagation.
//!
//! 1. If the request carries a valid `x-request-id` UUID and incoming IDs are
//!    trusted, it is kept
//! 2. Otherwise a new UUID v7 is generated
//!
//! The ID is stored in the context and echoed on the response.

use http::HeaderValue;
use lintel_core::{BoxFuture, Flow, Interceptor, InterceptorContext, Request, RequestId, Response};
use lintel_macros::interceptor;
use uuid::Uuid;

/// The header used for request ID propagation.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Interceptor that propagates or assigns request IDs.
#[interceptor(include = "/**")]
#[derive(Debug, Clone)]
pub struct RequestIdInterceptor {
    trust_incoming: bool,
}

impl RequestIdInterceptor {
    /// Creates an interceptor that keeps valid incoming IDs.
    #[must_use]
    pub fn new() -> Self {
        Self {
            trust_incoming: true,
        }
    }

    /// Creates an interceptor that always generates a fresh ID.
    #[must_use]
    pub fn ignore_incoming() -> Self {
        Self {
            trust_incoming: false,
        }
    }

    fn extract(&self, request: &Request) -> Option<RequestId> {
        if !self.trust_incoming {
            return None;
        }

        request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .map(RequestId::from_uuid)
    }
}

impl Default for RequestIdInterceptor {
    fn default() -> Self {
        Self::new()
    }
}

impl Interceptor for RequestIdInterceptor {
    fn name(&self) -> &'static str {
        "request_id"
    }

    fn pre_handle<'a>(
        &'a self,
        ctx: &'a mut InterceptorContext,
        request: &'a mut Request,
    ) -> BoxFuture<'a, Flow> {
        Box::pin(async move {
            let request_id = self.extract(request).unwrap_or_default();
            ctx.set_request_id(request_id);
            Flow::Continue
        })
    }

    fn post_handle<'a>(
        &'a self,
        ctx: &'a mut InterceptorContext,
        response: &'a mut Response,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            if let Ok(value) = HeaderValue::from_str(&ctx.request_id().to_string()) {
                response.headers_mut().insert(REQUEST_ID_HEADER, value);
            }
        })
    }
}
