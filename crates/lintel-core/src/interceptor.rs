//! The interceptor hook contract.
//!
//! An interceptor observes a request before the handler runs and the response
//! after it completes. Unlike a chain-style middleware it never calls the
//! next stage itself: the pipeline drives the hooks and decides, from the
//! interceptor's path patterns, whether it applies to a request at all.
//!
//! # Example
//!
//! ```
//! use lintel_core::{
//!     BoxFuture, Flow, Interceptor, InterceptorContext, Request, Response, ResponseExt,
//! };
//! use http::StatusCode;
//!
//! struct DenyWithoutToken;
//!
//! impl Interceptor for DenyWithoutToken {
//!     fn name(&self) -> &'static str {
//!         "deny_without_token"
//!     }
//!
//!     fn pre_handle<'a>(
//!         &'a self,
//!         _ctx: &'a mut InterceptorContext,
//!         request: &'a mut Request,
//!     ) -> BoxFuture<'a, Flow> {
//!         Box::pin(async move {
//!             if request.headers().contains_key("authorization") {
//!                 Flow::Continue
//!             } else {
//!                 Flow::Respond(Response::text(StatusCode::UNAUTHORIZED, "token required"))
//!             }
//!         })
//!     }
//! }
//! ```

use crate::context::InterceptorContext;
use crate::types::{Request, Response};
use std::future::Future;
use std::pin::Pin;

/// A boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Outcome of a `pre_handle` hook.
#[derive(Debug)]
pub enum Flow {
    /// Continue with the next interceptor, then the handler.
    Continue,
    /// Stop and answer the request with this response. The handler and
    /// any later interceptor's `pre_handle` are skipped.
    Respond(Response),
}

impl Flow {
    /// Returns true for [`Flow::Continue`].
    #[must_use]
    pub const fn is_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }
}

/// A request interceptor.
///
/// Both hooks default to doing nothing, so an implementation only overrides
/// the side it cares about.
///
/// # Invariants
///
/// - `post_handle` runs only if this interceptor's `pre_handle` ran
/// - `post_handle` hooks run in reverse install order
pub trait Interceptor: Send + Sync + 'static {
    /// Returns the name used in logs, metrics and the context trail.
    fn name(&self) -> &'static str;

    /// Runs before the handler.
    fn pre_handle<'a>(
        &'a self,
        ctx: &'a mut InterceptorContext,
        request: &'a mut Request,
    ) -> BoxFuture<'a, Flow> {
        let _ = (ctx, request);
        Box::pin(async { Flow::Continue })
    }

    /// Runs after the handler, or after a short-circuit.
    fn post_handle<'a>(
        &'a self,
        ctx: &'a mut InterceptorContext,
        response: &'a mut Response,
    ) -> BoxFuture<'a, ()> {
        let _ = (ctx, response);
        Box::pin(async {})
    }
}
