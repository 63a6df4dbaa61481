//! Common types used throughout the middleware chain.

use bytes::Bytes;
use http::{header, StatusCode};
use http_body_util::Full;

/// The HTTP request type used in the middleware chain.
///
/// This is a standard `http::Request` with a `Full<Bytes>` body.
pub type Request = http::Request<Full<Bytes>>;

/// The HTTP response type used in the middleware chain.
///
/// This is a standard `http::Response` with a `Full<Bytes>` body.
pub type Response = http::Response<Full<Bytes>>;

/// Extension trait for building common responses.
pub trait ResponseExt {
    /// Creates a `text/plain` response.
    fn text(status: StatusCode, body: impl Into<String>) -> Response;

    /// Creates an `application/json` response from pre-serialized bytes.
    fn json(status: StatusCode, body: Bytes) -> Response;

    /// Creates a response with the given content type.
    fn bytes(status: StatusCode, content_type: &str, body: Bytes) -> Response;

    /// Creates the plain `404 page not found` response.
    fn not_found() -> Response;
}

impl ResponseExt for Response {
    fn text(status: StatusCode, body: impl Into<String>) -> Response {
        Self::bytes(status, "text/plain; charset=utf-8", Bytes::from(body.into()))
    }

    fn json(status: StatusCode, body: Bytes) -> Response {
        Self::bytes(status, "application/json", body)
    }

    fn bytes(status: StatusCode, content_type: &str, body: Bytes) -> Response {
        let mut response = http::Response::new(Full::new(body));
        *response.status_mut() = status;
        if let Ok(value) = header::HeaderValue::from_str(content_type) {
            response.headers_mut().insert(header::CONTENT_TYPE, value);
        }
        response
    }

    fn not_found() -> Response {
        Self::text(StatusCode::NOT_FOUND, "404 page not found\n")
    }
}
