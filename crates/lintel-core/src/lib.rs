//! # Lintel Core
//!
//! Core types and traits shared by every Lintel crate.
//!
//! - [`Interceptor`] - The hook contract (`pre_handle` / `post_handle`)
//! - [`InterceptorContext`] - Per-request state carried through the hooks
//! - [`TypeKey`] - Stable identity of an interceptor type
//! - [`PatternSpec`] / [`DeclaredPatterns`] - Declared include/exclude path patterns
//! - [`InterceptorType`] - Type metadata consulted during discovery
//! - [`MiddlewareDescriptor`] - An accepted candidate, ready to install
//!
//! ## Example
//!
//! ```
//! use lintel_core::{InterceptorType, PatternSpec, TypeKey};
//!
//! let metadata = InterceptorType::new(TypeKey::new("app::interceptors::Audit"))
//!     .with_patterns(PatternSpec::new(["/api/**"], ["/api/health"]));
//!
//! assert!(metadata.is_concrete());
//! assert_eq!(metadata.key().name(), "Audit");
//! assert!(metadata.factory().is_none());
//! ```

#![doc(html_root_url = "https://docs.rs/lintel-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod descriptor;
mod error;
mod interceptor;
mod key;
mod metadata;
mod patterns;
mod types;

pub use context::{InterceptorContext, RequestId};
pub use descriptor::MiddlewareDescriptor;
pub use error::{BoxError, InstantiationError, KeyError};
pub use interceptor::{BoxFuture, Flow, Interceptor};
pub use key::{is_valid_path, TypeKey};
pub use metadata::{Factory, InterceptorType, TypeKind};
pub use patterns::{DeclaredPatterns, PatternSpec};
pub use types::{Request, Response, ResponseExt};
