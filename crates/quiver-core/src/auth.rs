//! Authentication token abstraction.
//!
//! Tokens are issued and validated elsewhere; the request context only
//! carries them to downstream handlers.

use std::any::Any;
use std::fmt::Debug;
use std::time::SystemTime;

/// An authentication token that has already been validated by its issuer.
///
/// Implementations are stored as `Arc<dyn AuthToken>` in the
/// [`RequestContext`](crate::RequestContext). Use
/// [`RequestContext::auth_token_as`](crate::RequestContext::auth_token_as)
/// to get the concrete token type back.
pub trait AuthToken: Debug + Send + Sync + 'static {
    /// The principal the token was issued to.
    fn subject(&self) -> &str;

    /// When the token stops being valid, if it expires.
    fn expires_at(&self) -> Option<SystemTime>;

    /// Returns `self` as [`Any`] for downcasting.
    fn as_any(&self) -> &dyn Any;
}
