//! Built-in middleware stages.
//!
//! - [`access_log`] - Request ID, request-scoped logger and one access log line per request
//! - [`base_path`] - Mount every route under a configured path prefix
//!
//! The usual order puts the access logger outermost so that its latency
//! covers every other stage:
//!
//! ```text
//! AccessLog → BasePath → (documentation host) → Router
//! ```

pub mod access_log;
pub mod base_path;

pub use access_log::{AccessLogMiddleware, AccessRecord};
pub use base_path::{BasePathMiddleware, RoutedPath};
