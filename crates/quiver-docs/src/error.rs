//! Error types for the documentation host.
//!
//! Every error here is raised while the host is being set up. Once built,
//! request-time problems become HTTP responses instead.

use quiver_core::PathJoinError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while setting up documentation hosting.
#[derive(Debug, Error)]
pub enum DocsError {
    /// The base path could not be joined with a documentation route.
    #[error("Invalid documentation base path {path:?}: {source}")]
    InvalidBasePath {
        /// The configured base path.
        path: String,
        /// The underlying join failure.
        #[source]
        source: PathJoinError,
    },

    /// Failed to serialize the OpenAPI spec to JSON.
    #[error("Failed to serialize OpenAPI spec: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An asset file or directory could not be read.
    #[error("Failed to read asset {}: {source}", path.display())]
    AssetRead {
        /// The file or directory that failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type for documentation operations.
pub type DocsResult<T> = Result<T, DocsError>;
