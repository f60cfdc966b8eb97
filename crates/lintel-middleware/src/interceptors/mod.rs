//! Built-in interceptors.
//!
//! These are ordinary interceptor types: each declares its patterns and can
//! be registered for discovery like an application interceptor.
//! [`DefaultInterceptor`] is special only in that scanning never installs it;
//! it is reserved for the fallback policy.

mod default;
mod request_id;
mod timing;

pub use default::DefaultInterceptor;
pub use request_id::{RequestIdInterceptor, REQUEST_ID_HEADER};
pub use timing::{TimingData, TimingInterceptor};
