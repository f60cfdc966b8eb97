//! # Lintel Test
//!
//! Fixtures for exercising interceptor discovery without an application:
//!
//! - [`RecordingRegistry`]: an install target that records every install
//!   and can be told to refuse one
//! - [`StaticScanner`] and [`FailingScanner`]: scripted [`Scanner`]s
//! - [`types`]: ready-made [`InterceptorType`] entries for each filter
//!   outcome
//! - [`TestRequest`] and [`TestResponse`]: request building and response
//!   inspection for pipeline tests
//!
//! ## Example
//!
//! ```
//! use lintel_discovery::{Engine, PassConfig, RegistrationLedger, TypeRegistry};
//! use lintel_test::{types, RecordingRegistry, StaticScanner};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(TypeRegistry::new().with(types::probe("app::B", "b", ["/api/**"], ["/api/health"])));
//! let scanner = Arc::new(StaticScanner::new(["app::B"]));
//! let engine = Engine::new(scanner, registry, Arc::new(RegistrationLedger::new()));
//!
//! let mut target = RecordingRegistry::new();
//! engine
//!     .configure(&PassConfig::new().with_namespace("app"), &mut target)
//!     .unwrap();
//!
//! assert_eq!(target.names(), ["b"]);
//! ```
//!
//! [`Scanner`]: lintel_discovery::Scanner
//! [`InterceptorType`]: lintel_core::InterceptorType

#![doc(html_root_url = "https://docs.rs/lintel-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod recording;
mod request;
mod response;
mod scanner;
pub mod types;

pub use error::TestError;
pub use recording::{InstallCall, RecordingRegistry};
pub use request::{TestRequest, TestRequestBuilder};
pub use response::TestResponse;
pub use scanner::{FailingScanner, StaticScanner};
pub use types::{Blocking, Probe};
