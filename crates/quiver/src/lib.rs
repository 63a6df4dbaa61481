//! # Quiver
//!
//! **HTTP middleware toolkit for small API services**
//!
//! Quiver wraps a router with the handful of stages every service ends up
//! writing by hand:
//!
//! - **Access logging**: a request ID, a per-request logger and one
//!   structured log line per request
//! - **Base paths**: mount the whole service under a prefix
//! - **API docs**: Swagger UI and `openapi.json` served next to the API
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quiver::prelude::*;
//! use http::StatusCode;
//!
//! # fn main() -> Result<(), quiver::Error> {
//! let config = ConfigLoader::new()
//!     .with_optional_file("quiver.toml")?
//!     .with_env_prefix("QUIVER")
//!     .load()?;
//!
//! quiver::init_logging(&config)?;
//!
//! let spec = serde_json::json!({ "openapi": "3.1.0", "paths": {} });
//! let router = handler_fn(|_ctx, _req| {
//!     Box::pin(async { Response::text(StatusCode::OK, "hello") })
//! });
//!
//! let pipeline = quiver::standard_stack(&config, &spec, router)?;
//! # let _ = pipeline;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Request → AccessLog → BasePath → SwaggerUi → Router
//!                                                 ↓
//! Response ← AccessLog ← BasePath ← SwaggerUi ←───┘
//! ```

#![doc(html_root_url = "https://docs.rs/quiver/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use serde::Serialize;
use thiserror::Error;

// Re-export core types
pub use quiver_core as core;

// Re-export middleware types
pub use quiver_middleware as middleware;

// Re-export documentation hosting
pub use quiver_docs as docs;

// Re-export logging setup
pub use quiver_telemetry as telemetry;

// Re-export configuration
pub use quiver_config as config;

use quiver_config::QuiverConfig;
use quiver_docs::SwaggerUiHost;
use quiver_middleware::stages::{AccessLogMiddleware, BasePathMiddleware};
use quiver_middleware::{Handler, Pipeline};

/// Errors raised while setting up a Quiver stack.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] quiver_config::ConfigError),

    /// The documentation host could not be built.
    #[error(transparent)]
    Docs(#[from] quiver_docs::DocsError),

    /// Logging could not be installed.
    #[error(transparent)]
    Telemetry(#[from] quiver_telemetry::TelemetryError),
}

/// Installs the global log subscriber described by `config.logging`.
///
/// Call before [`standard_stack`] so the access log has somewhere to go.
pub fn init_logging(config: &QuiverConfig) -> Result<(), Error> {
    let log_config = quiver_telemetry::LogConfig::from(config.logging.clone());
    quiver_telemetry::init_logging(&log_config)?;
    Ok(())
}

/// Wraps `router` in the standard stack.
///
/// Stages, outermost first: access log, base-path rewrite, then the Swagger
/// UI host when `config.docs.enabled` is set. The OpenAPI document is
/// serialized once, here.
///
/// # Errors
///
/// Returns [`Error::Docs`] if the docs base path is malformed or `spec`
/// fails to serialize.
pub fn standard_stack<S, H>(config: &QuiverConfig, spec: &S, router: H) -> Result<Pipeline, Error>
where
    S: Serialize + ?Sized,
    H: Handler,
{
    let logger = quiver_telemetry::LogConfig::from(config.logging.clone()).service_logger();

    let mut builder = Pipeline::builder()
        .layer(AccessLogMiddleware::new(logger))
        .layer(BasePathMiddleware::new(config.http.base_path.clone()));

    if config.docs.enabled {
        builder = builder.layer(SwaggerUiHost::new(&config.docs.base_path, spec)?);
    }

    Ok(builder.build(router))
}

/// Prelude module for convenient imports.
///
/// ```rust
/// use quiver::prelude::*;
/// ```
pub mod prelude {
    pub use quiver_core::{join_path, AuthToken, Logger, RequestContext, RequestId};

    pub use quiver_middleware::stages::{AccessLogMiddleware, AccessRecord, BasePathMiddleware};
    pub use quiver_middleware::{
        format_duration, handler_fn, BoxFuture, Handler, Middleware, Next, Pipeline, Request,
        Response, ResponseExt, ResponseObserver,
    };

    pub use quiver_docs::{AssetBundle, DocExpansion, SwaggerUiHost};

    pub use quiver_telemetry::{LogConfig, LogFormat};

    pub use quiver_config::{ConfigLoader, QuiverConfig};

    pub use crate::Error;
}
