//! Test request building.

use crate::error::TestError;
use bytes::Bytes;
use http::{HeaderName, HeaderValue, Method};
use http_body_util::Full;
use lintel_core::Request;

/// Entry points for building a [`Request`].
///
/// # Example
///
/// ```
/// use lintel_test::TestRequest;
///
/// let request = TestRequest::get("/api/users?page=2")
///     .header("x-request-id", "abc")
///     .build()
///     .unwrap();
///
/// assert_eq!(request.uri().path(), "/api/users");
/// assert_eq!(request.headers()["x-request-id"], "abc");
/// ```
#[derive(Debug)]
pub struct TestRequest;

impl TestRequest {
    /// Starts a GET request.
    pub fn get(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::GET, uri)
    }

    /// Starts a POST request.
    pub fn post(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::POST, uri)
    }

    /// Starts a PUT request.
    pub fn put(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::PUT, uri)
    }

    /// Starts a DELETE request.
    pub fn delete(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::DELETE, uri)
    }
}

/// Builder for test requests.
///
/// Invalid headers are reported by [`build`](Self::build).
#[must_use]
#[derive(Debug)]
pub struct TestRequestBuilder {
    method: Method,
    uri: String,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl TestRequestBuilder {
    /// Creates a builder.
    pub fn new(method: Method, uri: impl AsRef<str>) -> Self {
        Self {
            method,
            uri: uri.as_ref().to_string(),
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    /// Adds a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Builds the request.
    pub fn build(self) -> Result<Request, TestError> {
        let mut builder = http::Request::builder().method(self.method).uri(&self.uri);

        for (name, value) in &self.headers {
            let name = HeaderName::try_from(name.as_str())
                .map_err(|e| TestError::InvalidHeader(format!("{name}: {e}")))?;
            let value = HeaderValue::try_from(value.as_str())
                .map_err(|e| TestError::InvalidHeader(format!("{name}: {e}")))?;
            builder = builder.header(name, value);
        }

        builder
            .body(Full::new(self.body))
            .map_err(|e| TestError::RequestBuild(format!("{}: {e}", self.uri)))
    }
}
