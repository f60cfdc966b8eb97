//! # Lintel
//!
//! **Interceptor discovery and registration for HTTP request pipelines.**
//!
//! Lintel finds interceptor types in a namespace of a type registry, filters
//! out the ones that cannot or should not run, and installs each remaining
//! type exactly once per registration epoch into a path-routed pipeline. If
//! a pass would leave nothing installed, a pass-through default interceptor
//! is installed for all paths.
//!
//! ## Quick Start
//!
//! ```rust
//! use lintel::prelude::*;
//!
//! #[interceptor(include = "/api/**", exclude = "/api/health")]
//! #[derive(Default)]
//! struct Audit;
//!
//! impl Interceptor for Audit {
//!     fn name(&self) -> &'static str {
//!         "audit"
//!     }
//! }
//!
//! let registry = TypeRegistry::new().with(InterceptorType::declared::<Audit>());
//! let config = LintelConfig::builder()
//!     .namespace(module_path!())
//!     .build();
//!
//! let bootstrap = Bootstrap::new(config, registry);
//! let report = bootstrap.start().unwrap();
//!
//! assert_eq!(report.installed.len(), 1);
//! assert_eq!(bootstrap.pipeline().matching("/api/users"), ["audit"]);
//! assert!(bootstrap.pipeline().matching("/api/health").is_empty());
//! ```
//!
//! ## Crates
//!
//! | Crate | Role |
//! |---|---|
//! | [`core`] | type keys, pattern specs, the `Interceptor` trait |
//! | [`router`] | glob path patterns |
//! | [`middleware`] | the pipeline and built-in interceptors |
//! | [`discovery`] | scanner, filter, ledger, fallback, engine |
//! | [`config`] | typed layered configuration and file watching |
//! | [`telemetry`] | logging and metrics |

#![doc(html_root_url = "https://docs.rs/lintel/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bootstrap;
mod error;

pub use bootstrap::Bootstrap;
pub use error::{LintelError, LintelResult};

pub use lintel_config as config;
pub use lintel_core as core;
pub use lintel_discovery as discovery;
pub use lintel_middleware as middleware;
pub use lintel_router as router;
pub use lintel_telemetry as telemetry;

pub use lintel_config::{ConfigLoader, LintelConfig};
pub use lintel_discovery::{Engine, PassConfig, PassReport, TypeRegistry};
pub use lintel_macros::interceptor;

/// Prelude module for convenient imports.
///
/// ```rust
/// use lintel::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{Bootstrap, LintelError, LintelResult};

    pub use lintel_config::{ConfigLoader, LintelConfig};
    pub use lintel_core::{
        BoxFuture, DeclaredPatterns, Flow, Interceptor, InterceptorContext, InterceptorType,
        PatternSpec, Request, Response, ResponseExt, TypeKey,
    };
    pub use lintel_discovery::{
        Engine, PassConfig, PassReport, RegistrationLedger, Rejection, SkipReason, TypeRegistry,
    };
    pub use lintel_middleware::{
        DefaultInterceptor, InterceptorPipeline, InterceptorRegistry, RequestIdInterceptor,
        TimingInterceptor,
    };

    pub use lintel_macros::interceptor;
}
