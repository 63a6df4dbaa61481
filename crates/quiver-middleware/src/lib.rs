//! # Quiver Middleware
//!
//! Middleware chain composition and the built-in request stages.
//!
//! A [`Pipeline`] wraps a base [`Handler`] (usually the router) in an
//! ordered list of [`Middleware`]. The first middleware added is the
//! outermost: it sees the request first and the response last.
//!
//! ```text
//! Request → AccessLog → BasePath → SwaggerUi → Router
//!                                                 ↓
//! Response ← AccessLog ← BasePath ← SwaggerUi ←───┘
//! ```
//!
//! ## Built-in stages
//!
//! | Stage | Middleware | Purpose |
//! |-------|------------|---------|
//! | `access_log` | [`AccessLogMiddleware`] | Request ID, request logger, one access log line per request |
//! | `base_path` | [`BasePathMiddleware`] | Prefix the request path with a configured base path |
//!
//! The documentation host lives in `quiver-docs`.
//!
//! ## Example
//!
//! ```
//! use quiver_core::Logger;
//! use quiver_middleware::{handler_fn, Pipeline, Response, ResponseExt};
//! use quiver_middleware::stages::{AccessLogMiddleware, BasePathMiddleware};
//! use http::StatusCode;
//!
//! let pipeline = Pipeline::builder()
//!     .layer(AccessLogMiddleware::new(Logger::root("events-api")))
//!     .layer(BasePathMiddleware::new("/api"))
//!     .build(handler_fn(|_ctx, _req| {
//!         Box::pin(async { Response::text(StatusCode::OK, "ok") })
//!     }));
//!
//! assert_eq!(pipeline.stage_names(), vec!["access_log", "base_path"]);
//! ```

#![doc(html_root_url = "https://docs.rs/quiver-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod duration;
pub mod middleware;
pub mod observer;
pub mod pipeline;
pub mod stages;
pub mod types;

#[cfg(test)]
mod test_support;

pub use duration::format_duration;
pub use middleware::{handler_fn, BoxFuture, FnMiddleware, Handler, HandlerFn, Middleware, Next};
pub use observer::ResponseObserver;
pub use pipeline::{BoxedMiddleware, Pipeline, PipelineBuilder};
pub use quiver_core::RequestContext;
pub use stages::{AccessLogMiddleware, AccessRecord, BasePathMiddleware, RoutedPath};
pub use types::{Request, Response, ResponseExt};
