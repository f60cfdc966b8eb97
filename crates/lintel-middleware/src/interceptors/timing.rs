//! Per-request timing.

use lintel_core::{BoxFuture, Flow, Interceptor, InterceptorContext, Request, Response};
use lintel_macros::interceptor;
use std::time::{Duration, Instant};

/// Timing recorded for one request, stored in the context extensions once
/// `post_handle` has run.
#[derive(Debug, Clone)]
pub struct TimingData {
    /// The HTTP method.
    pub method: String,
    /// The request path.
    pub path: String,
    /// The response status code.
    pub status_code: u16,
    /// Time between `pre_handle` and `post_handle`.
    pub duration: Duration,
}

struct Started {
    at: Instant,
    method: String,
    path: String,
}

/// Interceptor that logs method, path, status and duration of each request.
#[interceptor(include = "/**")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TimingInterceptor;

impl TimingInterceptor {
    /// Creates a timing interceptor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Interceptor for TimingInterceptor {
    fn name(&self) -> &'static str {
        "timing"
    }

    fn pre_handle<'a>(
        &'a self,
        ctx: &'a mut InterceptorContext,
        request: &'a mut Request,
    ) -> BoxFuture<'a, Flow> {
        Box::pin(async move {
            ctx.set_extension(Started {
                at: Instant::now(),
                method: request.method().to_string(),
                path: request.uri().path().to_string(),
            });
            Flow::Continue
        })
    }

    fn post_handle<'a>(
        &'a self,
        ctx: &'a mut InterceptorContext,
        response: &'a mut Response,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let Some(started) = ctx.take_extension::<Started>() else {
                return;
            };

            let data = TimingData {
                method: started.method,
                path: started.path,
                status_code: response.status().as_u16(),
                duration: started.at.elapsed(),
            };

            tracing::info!(
                request_id = %ctx.request_id(),
                method = %data.method,
                path = %data.path,
                status_code = data.status_code,
                duration_ms = data.duration.as_secs_f64() * 1000.0,
                "request completed"
            );

            ctx.set_extension(data);
        })
    }
}
