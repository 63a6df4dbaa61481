//! # Quiver Core
//!
//! Core types shared by every Quiver crate:
//!
//! - [`RequestContext`] - Typed per-request store for the request ID, logger and auth token
//! - [`RequestId`] - UUID v7 request identifier
//! - [`Logger`] - Span-backed logger handle that tags events with a request ID
//! - [`AuthToken`] - Opaque, externally validated authentication token
//! - [`path`] - URL path joining and lexical cleaning

#![doc(html_root_url = "https://docs.rs/quiver-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod auth;
mod context;
mod logger;
pub mod path;

pub use auth::AuthToken;
pub use context::{RequestContext, RequestId};
pub use logger::Logger;
pub use path::{join_path, PathJoinError};
