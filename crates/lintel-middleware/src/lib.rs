//! # Lintel Middleware
//!
//! The interceptor pipeline that discovered interceptors are installed into,
//! plus the built-in interceptors.
//!
//! ## Request Flow
//!
//! ```text
//! Request ─► pre_handle(I1) ─► pre_handle(I2) ─► ... ─► Handler
//!                                                         │
//! Response ◄─ post_handle(I1) ◄─ post_handle(I2) ◄─ ... ◄─┘
//! ```
//!
//! Only interceptors whose include/exclude patterns match the normalized
//! request path take part. Interceptors run in install order; a
//! `pre_handle` returning [`Flow::Respond`](lintel_core::Flow::Respond)
//! stops the forward pass and skips the handler.
//!
//! ## Built-in Interceptors
//!
//! | Interceptor              | Purpose                                      |
//! |--------------------------|----------------------------------------------|
//! | [`DefaultInterceptor`]   | Pass-through sentinel installed as fallback  |
//! | [`RequestIdInterceptor`] | Propagate or assign `x-request-id` (UUID v7) |
//! | [`TimingInterceptor`]    | Per-request timing log                       |
//!
//! ## Example
//!
//! ```
//! use lintel_middleware::{InterceptorPipeline, InterceptorRegistry, TimingInterceptor};
//! use std::sync::Arc;
//!
//! let mut pipeline = InterceptorPipeline::new();
//! pipeline
//!     .install(
//!         Arc::new(TimingInterceptor::new()),
//!         &["/api/**".to_string()],
//!         &["/api/health".to_string()],
//!     )
//!     .unwrap();
//!
//! assert_eq!(pipeline.matching("/api/users"), ["timing"]);
//! assert!(pipeline.matching("/api/health").is_empty());
//! ```

#![doc(html_root_url = "https://docs.rs/lintel-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod interceptors;
pub mod pipeline;

pub use error::InstallError;
pub use interceptors::{
    DefaultInterceptor, RequestIdInterceptor, TimingData, TimingInterceptor, REQUEST_ID_HEADER,
};
pub use pipeline::{InterceptorPipeline, InterceptorRegistry, Registration};
