//! # Quiver Docs
//!
//! Hosts interactive API documentation next to the service it describes.
//!
//! This crate provides:
//! - **[`SwaggerUiHost`]**: middleware serving Swagger UI and the OpenAPI document
//! - **[`AssetBundle`]**: the static files behind the UI, built in or loaded from disk
//!
//! The OpenAPI document itself is generated elsewhere; any `Serialize` value
//! will do.
//!
//! ## Quick Start
//!
//! ```
//! use quiver_docs::SwaggerUiHost;
//! use quiver_middleware::{handler_fn, Pipeline, Response, ResponseExt};
//! use http::StatusCode;
//!
//! let spec = serde_json::json!({ "openapi": "3.1.0", "paths": {} });
//!
//! let pipeline = Pipeline::builder()
//!     .layer(SwaggerUiHost::new("/api", &spec)?)
//!     .build(handler_fn(|_ctx, _req| {
//!         Box::pin(async { Response::text(StatusCode::OK, "router") })
//!     }));
//! # Ok::<(), quiver_docs::DocsError>(())
//! ```
//!
//! `GET /api/swagger-ui/` now serves the UI, `GET /api/openapi.json` the
//! document, and everything else reaches the router.

#![doc(html_root_url = "https://docs.rs/quiver-docs/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod assets;
mod error;
mod swagger;

pub use assets::{Asset, AssetBundle};
pub use error::{DocsError, DocsResult};
pub use swagger::{DocExpansion, SwaggerUiHost, INITIALIZER_FILE};
