//! Span-backed logger handle.
//!
//! Output configuration (format, level, sink) is process-wide and installed
//! once at startup by `quiver-telemetry`. A [`Logger`] only decides which
//! fields every event recorded through it carries: it wraps a
//! [`tracing::Span`], and events emitted inside that span inherit its fields.

use crate::context::RequestId;
use tracing::Span;

/// Cheap-to-clone logger handle.
///
/// # Example
///
/// ```
/// use quiver_core::{Logger, RequestId};
///
/// let base = Logger::root("events-api");
/// let request_logger = base.for_request(RequestId::new());
///
/// request_logger.in_scope(|| tracing::info!("tagged with the request ID"));
/// ```
#[derive(Debug, Clone)]
pub struct Logger {
    span: Span,
}

impl Logger {
    /// Creates the base logger for a service.
    #[must_use]
    pub fn root(service_name: &str) -> Self {
        Self {
            span: tracing::info_span!("service", service = %service_name),
        }
    }

    /// Creates a logger that adds no fields of its own.
    #[must_use]
    pub fn disabled() -> Self {
        Self { span: Span::none() }
    }

    /// Wraps an existing span.
    #[must_use]
    pub fn from_span(span: Span) -> Self {
        Self { span }
    }

    /// Derives a child logger whose events carry `request-id`.
    #[must_use]
    pub fn for_request(&self, request_id: RequestId) -> Self {
        Self {
            span: tracing::info_span!(parent: &self.span, "request", "request-id" = %request_id),
        }
    }

    /// Returns the span backing this logger.
    #[must_use]
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Runs `f` with this logger's span entered.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        self.span.in_scope(f)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::disabled()
    }
}
