//! # Lintel Discovery
//!
//! Finds interceptor types, decides which are eligible, and installs each at
//! most once per registration epoch.
//!
//! ## Components
//!
//! - [`Scanner`]: enumerates candidate type keys under a namespace;
//!   [`RegistryScanner`] walks a [`TypeRegistry`]
//! - [`CandidateFilter`]: rejects abstract types, the fallback sentinel,
//!   types without patterns and types that are not interceptors
//! - [`RegistrationLedger`]: epoch-scoped idempotency
//! - [`FallbackState`]: installs the pass-through default when a pass would
//!   leave the pipeline empty
//! - [`Engine`]: runs a configuration pass and returns a [`PassReport`]
//!
//! ## Example
//!
//! ```
//! use lintel_core::InterceptorType;
//! use lintel_discovery::{Engine, PassConfig, RegistrationLedger, TypeRegistry};
//! use lintel_middleware::{InterceptorPipeline, TimingInterceptor};
//! use std::sync::Arc;
//!
//! let registry = TypeRegistry::new().with(InterceptorType::declared::<TimingInterceptor>());
//! let engine = Engine::from_registry(Arc::new(registry), Arc::new(RegistrationLedger::new()));
//!
//! let mut pipeline = InterceptorPipeline::new();
//! let report = engine
//!     .configure(&PassConfig::new().with_namespace("lintel_middleware"), &mut pipeline)
//!     .unwrap();
//!
//! assert_eq!(pipeline.names(), ["timing"]);
//! assert!(!report.fallback_activated);
//! ```

#![doc(html_root_url = "https://docs.rs/lintel-discovery/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod engine;
mod error;
mod fallback;
mod filter;
mod ledger;
mod registry;
mod report;
mod scanner;

pub use engine::{Engine, PassConfig};
pub use error::{DiscoveryError, EngineError, ResolutionError};
pub use fallback::FallbackState;
pub use filter::{Candidate, CandidateFilter, Filtered, Rejection};
pub use ledger::{Epoch, LedgerRecord, RegistrationLedger};
pub use registry::TypeRegistry;
pub use report::{
    InstallSource, InstalledInterceptor, IssueKind, PassIssue, PassReport, SkipReason,
    SkippedCandidate,
};
pub use scanner::{validate_namespace, RegistryScanner, Scanner};
