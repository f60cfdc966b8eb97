//! HTTP request and response types seen by interceptors.

use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::StatusCode;
use http_body_util::Full;

/// The request type passed through interceptors.
pub type Request = http::Request<Full<Bytes>>;

/// The response type produced by handlers and short-circuiting interceptors.
pub type Response = http::Response<Full<Bytes>>;

/// Convenience constructors for [`Response`].
pub trait ResponseExt {
    /// Creates a plain-text response.
    fn text(status: StatusCode, body: impl Into<Bytes>) -> Response;

    /// Creates an empty response with the given status.
    fn empty(status: StatusCode) -> Response;
}

impl ResponseExt for Response {
    fn text(status: StatusCode, body: impl Into<Bytes>) -> Response {
        let mut response = http::Response::new(Full::new(body.into()));
        *response.status_mut() = status;
        response.headers_mut().insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        response
    }

    fn empty(status: StatusCode) -> Response {
        let mut response = http::Response::new(Full::new(Bytes::new()));
        *response.status_mut() = status;
        response
    }
}
