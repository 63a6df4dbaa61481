//! Typed configuration for Quiver middleware stacks.
//!
//! Configuration is layered: built-in defaults, then a TOML or JSON file,
//! then `PREFIX__SECTION__KEY` environment variables. Files are strict and
//! reject unknown fields.
//!
//! # Example
//!
//! ```no_run
//! use quiver_config::ConfigLoader;
//!
//! # fn main() -> Result<(), quiver_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_file("quiver.toml")?
//!     .with_env_prefix("QUIVER")
//!     .load()?;
//!
//! println!("Docs at {}", config.docs.base_path);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [http]
//! base_path = "/api"
//!
//! [docs]
//! enabled = true
//! base_path = "/api/docs"
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//! service_name = "events"
//! ```
//!
//! # Environment Variable Overrides
//!
//! - `QUIVER__HTTP__BASE_PATH=/api`
//! - `QUIVER__DOCS__ENABLED=false`
//! - `QUIVER__LOGGING__LEVEL=debug`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::QuiverConfig;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{DocsConfig, HttpConfig, LoggingConfig};

pub use quiver_telemetry::LogFormat;
