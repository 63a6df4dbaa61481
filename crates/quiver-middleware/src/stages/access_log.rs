//! Access logging middleware.
//!
//! Assigns every request a [`RequestId`], derives a request-scoped
//! [`Logger`] from the service logger, and emits exactly one access log
//! event when the request completes.
//!
//! # Log Fields
//!
//! | Field | Source |
//! |-------|--------|
//! | `request-id` | Request span, generated UUID v7 |
//! | `latency` | [`format_duration`] of the time spent downstream |
//! | `request-content-length` | `Content-Length` header, else exact body size, else `-1` |
//! | `resp-body-size` | Body bytes of the response |
//! | `host` | URI authority, else the `Host` header |
//! | `method` | Request method |
//! | `status-code` | Response status |
//! | `path` | [`RoutedPath`] left by a downstream rewrite, else the request path |
//!
//! Downstream stages see the request logger through
//! [`RequestContext::logger`], so anything they log carries the same
//! `request-id`.

use crate::duration::format_duration;
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::observer::ResponseObserver;
use crate::stages::base_path::RoutedPath;
use crate::types::{Request, Response};
use futures_util::FutureExt;
use http::header;
use http_body::Body;
use quiver_core::{Logger, RequestContext, RequestId};
use std::panic::AssertUnwindSafe;
use std::time::Instant;
use tracing::Instrument;

/// Middleware that logs one line per request.
///
/// # Example
///
/// ```
/// use quiver_core::Logger;
/// use quiver_middleware::{Middleware, stages::AccessLogMiddleware};
///
/// let access_log = AccessLogMiddleware::new(Logger::root("events-api"));
/// assert_eq!(access_log.name(), "access_log");
/// ```
#[derive(Debug, Clone, Default)]
pub struct AccessLogMiddleware {
    /// Service logger that request loggers are derived from.
    logger: Logger,
}

/// The data behind one access log line.
///
/// Stored in the [`RequestContext`] as an extension once the request has
/// completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRecord {
    /// The generated request ID.
    pub request_id: RequestId,
    /// Formatted latency, e.g. `1.5ms`.
    pub latency: String,
    /// Declared or known request body size; `-1` when unknown.
    pub request_content_length: i64,
    /// Response body bytes.
    pub resp_body_size: u64,
    /// Request host.
    pub host: String,
    /// Request method.
    pub method: String,
    /// Response status code.
    pub status_code: u16,
    /// Request path.
    pub path: String,
}

impl AccessLogMiddleware {
    /// Creates an access logger deriving request loggers from `logger`.
    #[must_use]
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    /// Returns the service logger.
    #[must_use]
    pub fn logger(&self) -> &Logger {
        &self.logger
    }
}

impl Middleware for AccessLogMiddleware {
    fn name(&self) -> &'static str {
        "access_log"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let start = Instant::now();

            let request_id = RequestId::new();
            let logger = self.logger.for_request(request_id);
            ctx.set_request_id(request_id);
            ctx.set_logger(logger.clone());

            let method = request.method().to_string();
            let path = request.uri().path().to_string();
            let host = request_host(&request);
            let request_content_length = request_content_length(&request);

            let outcome = AssertUnwindSafe(next.run(ctx, request).instrument(logger.span().clone()))
                .catch_unwind()
                .await;

            let path = ctx
                .get_extension::<RoutedPath>()
                .map_or(path, |routed| routed.0.clone());

            let mut observer = ResponseObserver::new();
            if let Ok(response) = &outcome {
                observer.observe(response);
            }

            let record = AccessRecord {
                request_id,
                latency: format_duration(start.elapsed()),
                request_content_length,
                resp_body_size: observer.bytes_written(),
                host,
                method,
                status_code: observer.status().as_u16(),
                path,
            };

            logger.in_scope(|| {
                tracing::info!(
                    latency = %record.latency,
                    "request-content-length" = record.request_content_length,
                    "resp-body-size" = record.resp_body_size,
                    host = %record.host,
                    method = %record.method,
                    "status-code" = record.status_code,
                    path = %record.path,
                    "Access log"
                );
            });
            ctx.set_extension(record);

            match outcome {
                Ok(response) => response,
                Err(panic) => std::panic::resume_unwind(panic),
            }
        })
    }
}

fn request_host(request: &Request) -> String {
    if let Some(authority) = request.uri().authority() {
        return authority.to_string();
    }

    request
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn request_content_length(request: &Request) -> i64 {
    let declared = request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<i64>().ok());

    declared
        .or_else(|| {
            request
                .body()
                .size_hint()
                .exact()
                .and_then(|len| i64::try_from(len).ok())
        })
        .unwrap_or(-1)
}
