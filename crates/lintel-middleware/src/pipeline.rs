//! Pattern-routed interceptor pipeline.
//!
//! The pipeline is the install target of interceptor discovery. Each
//! [`InterceptorRegistry::install`] call compiles the interceptor's include
//! and exclude patterns once and appends a [`Registration`]; at request time
//! the pipeline asks every registration whether it applies to the request
//! path.
//!
//! ## Ordering
//!
//! - `pre_handle` hooks run in install order
//! - `post_handle` hooks run in reverse install order, and only for
//!   interceptors whose `pre_handle` ran
//! - a [`Flow::Respond`] skips the remaining `pre_handle` hooks and the handler

use crate::error::InstallError;
use lintel_core::{BoxFuture, Flow, Interceptor, InterceptorContext, Request, Response};
use lintel_router::{normalize_path, PathMatcher};
use lintel_telemetry::metrics;
use std::fmt;
use std::sync::Arc;

/// An install target for interceptors.
///
/// Implemented by [`InterceptorPipeline`]; hosts embedding Lintel in another
/// framework implement it over their own chain.
pub trait InterceptorRegistry {
    /// Installs `interceptor`, applied to paths matching any `include`
    /// pattern and no `exclude` pattern.
    ///
    /// Installing the same interceptor type twice (as two instances) is
    /// allowed; deduplication is the caller's concern.
    fn install(
        &mut self,
        interceptor: Arc<dyn Interceptor>,
        include: &[String],
        exclude: &[String],
    ) -> Result<(), InstallError>;
}

/// An installed interceptor and its compiled path matcher.
#[derive(Clone)]
pub struct Registration {
    interceptor: Arc<dyn Interceptor>,
    matcher: PathMatcher,
}

impl Registration {
    /// Returns the interceptor.
    #[must_use]
    pub fn interceptor(&self) -> &Arc<dyn Interceptor> {
        &self.interceptor
    }

    /// Returns the compiled include/exclude matcher.
    #[must_use]
    pub fn matcher(&self) -> &PathMatcher {
        &self.matcher
    }

    /// Returns the interceptor name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.interceptor.name()
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("interceptor", &self.interceptor.name())
            .field("matcher", &self.matcher)
            .finish()
    }
}

/// An ordered list of path-routed interceptors.
///
/// # Example
///
/// ```
/// use lintel_middleware::{DefaultInterceptor, InterceptorPipeline, InterceptorRegistry};
/// use std::sync::Arc;
///
/// let mut pipeline = InterceptorPipeline::new();
/// pipeline
///     .install(Arc::new(DefaultInterceptor), &["/**".to_string()], &[])
///     .unwrap();
///
/// assert_eq!(pipeline.len(), 1);
/// assert_eq!(pipeline.names(), ["default"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InterceptorPipeline {
    registrations: Vec<Registration>,
}

impl InterceptorPipeline {
    /// Creates an empty pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of installed interceptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Returns true if nothing is installed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Returns the registrations in install order.
    #[must_use]
    pub fn registrations(&self) -> &[Registration] {
        &self.registrations
    }

    /// Returns the interceptor names in install order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.registrations.iter().map(Registration::name).collect()
    }

    /// Returns the names of the interceptors that apply to `path`, in the
    /// order they would run.
    #[must_use]
    pub fn matching(&self, path: &str) -> Vec<&'static str> {
        let normalized = normalize_path(path);
        self.registrations
            .iter()
            .filter(|r| r.matcher.matches_normalized(&normalized))
            .map(Registration::name)
            .collect()
    }

    /// Runs a request through the matching interceptors and the handler.
    ///
    /// `ctx` records the name of every interceptor whose `pre_handle` ran.
    pub async fn process<H>(
        &self,
        ctx: &mut InterceptorContext,
        mut request: Request,
        handler: H,
    ) -> Response
    where
        H: FnOnce(&mut InterceptorContext, Request) -> BoxFuture<'static, Response> + Send,
    {
        let path = normalize_path(request.uri().path()).into_owned();

        let mut entered: Vec<&Registration> = Vec::new();
        let mut short_circuit = None;

        for registration in &self.registrations {
            if !registration.matcher.matches_normalized(&path) {
                continue;
            }

            let name = registration.name();
            ctx.record(name);
            entered.push(registration);
            metrics::record_intercepted(name);

            match registration
                .interceptor
                .pre_handle(ctx, &mut request)
                .await
            {
                Flow::Continue => {}
                Flow::Respond(response) => {
                    tracing::debug!(interceptor = name, path = %path, "request short-circuited");
                    short_circuit = Some(response);
                    break;
                }
            }
        }

        let mut response = match short_circuit {
            Some(response) => response,
            None => handler(ctx, request).await,
        };

        for registration in entered.iter().rev() {
            registration
                .interceptor
                .post_handle(ctx, &mut response)
                .await;
        }

        response
    }
}

impl InterceptorRegistry for InterceptorPipeline {
    fn install(
        &mut self,
        interceptor: Arc<dyn Interceptor>,
        include: &[String],
        exclude: &[String],
    ) -> Result<(), InstallError> {
        let matcher =
            PathMatcher::new(include, exclude).map_err(|source| InstallError::InvalidPattern {
                interceptor: interceptor.name().to_string(),
                source,
            })?;

        tracing::trace!(
            interceptor = interceptor.name(),
            position = self.registrations.len(),
            "interceptor appended to pipeline"
        );

        self.registrations.push(Registration {
            interceptor,
            matcher,
        });
        Ok(())
    }
}
