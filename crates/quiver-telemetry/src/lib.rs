//! Logging setup for Quiver services.
//!
//! - **Logging**: `tracing-subscriber` output in JSON, pretty or compact form
//! - **Service logger**: the base [`quiver_core::Logger`] that per-request
//!   loggers are derived from
//!
//! # Example
//!
//! ```rust,no_run
//! use quiver_telemetry::{init_logging, LogConfig, LogFormat};
//!
//! let config = LogConfig {
//!     format: LogFormat::Compact,
//!     service_name: "events-api".to_string(),
//!     ..LogConfig::development()
//! };
//! init_logging(&config).expect("Failed to init logging");
//! ```

#![doc(html_root_url = "https://docs.rs/quiver-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{create_env_filter, init_logging, LogConfig, LogFormat};
