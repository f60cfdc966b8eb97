//! Hierarchical glob path matching for Lintel.
//!
//! This crate decides *which* request paths an interceptor applies to. Every
//! installed interceptor carries a set of include patterns and a set of
//! exclude patterns; a request path is routed to the interceptor when any
//! include pattern matches and no exclude pattern does.
//!
//! # Pattern Syntax
//!
//! | Segment    | Matches                                          |
//! |------------|--------------------------------------------------|
//! | `users`    | exactly the segment `users` (case-sensitive)     |
//! | `*`        | exactly one segment                              |
//! | `**`       | zero or more segments                            |
//! | `*.html`   | one segment, `*` within the segment             |
//! | `v?`       | one segment, `?` matches a single character      |
//!
//! Paths are normalized before matching (see [`normalize_path`]) so `/api/`,
//! `/api` and `//api` are the same path.
//!
//! # Example
//!
//! ```rust
//! use lintel_router::PathMatcher;
//!
//! let matcher = PathMatcher::new(["/api/**"], ["/api/health"]).unwrap();
//!
//! assert!(matcher.matches("/api/users/42"));
//! assert!(matcher.matches("/api"));
//! assert!(!matcher.matches("/api/health"));
//! assert!(!matcher.matches("/static/app.js"));
//! ```
//!
//! # Architecture
//!
//! Patterns are split into segments once, at install time:
//!
//! ```text
//!   "/api/*/files/**/*.png"
//!        │
//!        ▼
//!   [Literal("api"), AnySegment, Literal("files"), AnyDepth, Wildcard("*.png")]
//! ```
//!
//! Matching walks path segments against pattern segments, backtracking only
//! at `**`.

mod error;
mod matcher;
mod normalize;
mod pattern;

pub use error::PatternError;
pub use matcher::PathMatcher;
pub use normalize::normalize_path;
pub use pattern::{PathPattern, Segment};

/// The pattern that matches every path.
pub const MATCH_ALL: &str = "/**";
