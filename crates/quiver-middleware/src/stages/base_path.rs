//! Base path middleware.
//!
//! Mounts the downstream router under a configured prefix by rewriting the
//! request path to `join_path(base, path)` before passing it on. The query
//! string is kept.
//!
//! A rewrite that cannot be performed is logged and the request continues
//! with its original URI.
//!
//! The rewritten path is also stored in the [`RequestContext`] as a
//! [`RoutedPath`], so outer stages such as the access log report the path
//! the router actually saw.

use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{Request, Response};
use http::uri::{PathAndQuery, Uri};
use quiver_core::{join_path, RequestContext};

/// Middleware that prefixes every request path with a base path.
///
/// # Example
///
/// ```
/// use quiver_middleware::{Middleware, stages::BasePathMiddleware};
///
/// let base = BasePathMiddleware::new("/api");
/// assert_eq!(base.base_path(), "/api");
/// assert_eq!(base.name(), "base_path");
/// ```
#[derive(Debug, Clone)]
pub struct BasePathMiddleware {
    base_path: String,
}

/// The request path after base-path rewriting.
///
/// Stored as a context extension. Absent when no rewrite happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedPath(pub String);

impl BasePathMiddleware {
    /// Creates a middleware that mounts requests under `base_path`.
    #[must_use]
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Returns the configured base path.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    fn rewrite(&self, uri: &Uri) -> Result<Uri, RewriteError> {
        let mut path = join_path(&self.base_path, &[uri.path()])?;
        if !path.starts_with('/') {
            path.insert(0, '/');
        }

        let path_and_query = match uri.query() {
            Some(query) => PathAndQuery::try_from(format!("{path}?{query}"))?,
            None => PathAndQuery::try_from(path)?,
        };

        let mut parts = uri.clone().into_parts();
        parts.path_and_query = Some(path_and_query);
        Uri::from_parts(parts).map_err(|e| RewriteError::Uri(e.into()))
    }
}

impl Middleware for BasePathMiddleware {
    fn name(&self) -> &'static str {
        "base_path"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        mut request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            match self.rewrite(request.uri()) {
                Ok(uri) => {
                    ctx.set_extension(RoutedPath(uri.path().to_string()));
                    *request.uri_mut() = uri;
                }
                Err(error) => {
                    let log = || {
                        tracing::error!(
                            base_path = %self.base_path,
                            path = %request.uri().path(),
                            error = %error,
                            "Failed to join base path, passing request through"
                        );
                    };
                    match ctx.logger() {
                        Some(logger) => logger.in_scope(log),
                        None => log(),
                    }
                }
            }

            next.run(ctx, request).await
        })
    }
}

#[derive(Debug, thiserror::Error)]
enum RewriteError {
    #[error(transparent)]
    Join(#[from] quiver_core::PathJoinError),

    #[error("invalid rewritten URI: {0}")]
    Uri(#[from] http::Error),
}

impl From<http::uri::InvalidUri> for RewriteError {
    fn from(e: http::uri::InvalidUri) -> Self {
        Self::Uri(e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::handler_fn;
    use crate::test_support::Capture;
    use crate::types::ResponseExt;
    use bytes::Bytes;
    use http::{Request as HttpRequest, StatusCode};
    use http_body_util::{BodyExt, Full};
    use quiver_core::{Logger, RequestId};

    fn echo_uri() -> impl crate::middleware::Handler {
        handler_fn(|_ctx, req| {
            let uri = req.uri().to_string();
            Box::pin(async move { Response::text(StatusCode::OK, uri) })
        })
    }

    async fn rewritten(base: &str, uri: &str) -> String {
        let middleware = BasePathMiddleware::new(base);
        let handler = echo_uri();
        let mut ctx = RequestContext::new();
        let request = HttpRequest::builder()
            .uri(uri)
            .body(Full::new(Bytes::new()))
            .unwrap();

        let response = middleware
            .process(&mut ctx, request, Next::endpoint(&handler))
            .await;
        let body = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_prefixes_path() {
        assert_eq!(rewritten("/api", "/foo").await, "/api/foo");
    }

    #[tokio::test]
    async fn test_keeps_query() {
        assert_eq!(rewritten("/api", "/events?page=2").await, "/api/events?page=2");
    }

    #[tokio::test]
    async fn test_collapses_separators() {
        assert_eq!(rewritten("/api/", "//foo//bar").await, "/api/foo/bar");
    }

    #[tokio::test]
    async fn test_keeps_trailing_slash() {
        assert_eq!(rewritten("/api", "/swagger-ui/").await, "/api/swagger-ui/");
    }

    #[tokio::test]
    async fn test_relative_base_gets_leading_slash() {
        assert_eq!(rewritten("api", "/foo").await, "/api/foo");
        assert_eq!(rewritten("", "/foo").await, "/foo");
    }

    #[tokio::test]
    async fn test_absolute_request_uri_keeps_authority() {
        assert_eq!(
            rewritten("/api", "http://archery.example/foo").await,
            "http://archery.example/api/foo"
        );
    }

    #[tokio::test]
    async fn test_invalid_base_passes_through() {
        assert_eq!(rewritten("/api%zz", "/foo?x=1").await, "/foo?x=1");
        assert_eq!(rewritten("/api\u{7f}", "/foo").await, "/foo");
    }

    #[tokio::test]
    async fn test_records_routed_path() {
        let middleware = BasePathMiddleware::new("/api");
        let handler = echo_uri();
        let mut ctx = RequestContext::new();
        let request = HttpRequest::builder()
            .uri("/events?page=2")
            .body(Full::new(Bytes::new()))
            .unwrap();

        middleware
            .process(&mut ctx, request, Next::endpoint(&handler))
            .await;

        assert_eq!(
            ctx.get_extension::<RoutedPath>(),
            Some(&RoutedPath("/api/events".to_string()))
        );
    }

    #[tokio::test]
    async fn test_join_failure_is_logged_with_request_id() {
        let capture = Capture::default();
        let _guard = tracing::subscriber::set_default(capture.subscriber());

        let request_id = RequestId::new();
        let mut ctx = RequestContext::new();
        ctx.set_logger(Logger::root("test-service").for_request(request_id));

        let middleware = BasePathMiddleware::new("/api%zz");
        let handler = echo_uri();
        let request = HttpRequest::builder()
            .uri("/foo")
            .body(Full::new(Bytes::new()))
            .unwrap();

        let response = middleware
            .process(&mut ctx, request, Next::endpoint(&handler))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(ctx.get_extension::<RoutedPath>().is_none());

        let output = capture.contents();
        let errors: Vec<&str> = output
            .lines()
            .filter(|line| line.contains("\"level\":\"ERROR\""))
            .collect();
        assert_eq!(errors.len(), 1);

        let line = errors[0];
        assert!(line.contains("/api%zz"));
        assert!(line.contains("invalid URL escape"));
        assert!(line.contains(&request_id.to_string()));
    }

    #[tokio::test]
    async fn test_join_failure_is_logged_without_request_logger() {
        let capture = Capture::default();
        let _guard = tracing::subscriber::set_default(capture.subscriber());

        assert_eq!(rewritten("/api\u{7f}", "/foo").await, "/foo");

        let output = capture.contents();
        let errors = output
            .lines()
            .filter(|line| line.contains("\"level\":\"ERROR\""))
            .count();
        assert_eq!(errors, 1);
        assert!(output.contains("invalid control character"));
    }
}
