//! Request context types.
//!
//! The [`RequestContext`] carries per-request state through the middleware
//! chain: the request ID, the request-scoped [`Logger`] and the caller's
//! [`AuthToken`]. Each value is optional until the middleware that owns it
//! has run, so lookups report absence instead of failing.

use crate::auth::AuthToken;
use crate::logger::Logger;
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// A unique identifier for each request, using UUID v7.
///
/// UUID v7 is time-ordered, which makes it ideal for request tracking
/// and log correlation.
///
/// # Example
///
/// ```
/// use quiver_core::RequestId;
///
/// let id = RequestId::new();
/// println!("Request ID: {}", id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID using UUID v7.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `RequestId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<RequestId> for Uuid {
    fn from(id: RequestId) -> Self {
        id.0
    }
}

/// Per-request context that flows through the middleware chain.
///
/// A fresh context is created for every request and dropped when the
/// request completes. Middleware populate it on the way in; downstream
/// stages and handlers read it.
///
/// # Example
///
/// ```
/// use quiver_core::{RequestContext, RequestId};
///
/// let mut ctx = RequestContext::new();
/// assert!(ctx.request_id().is_none());
///
/// let id = RequestId::new();
/// ctx.set_request_id(id);
/// assert_eq!(ctx.request_id(), Some(id));
/// ```
pub struct RequestContext {
    /// Unique identifier for this request, set by the access logger.
    request_id: Option<RequestId>,

    /// Logger tagged with the request ID.
    logger: Option<Logger>,

    /// Token of the authenticated caller, set by an authentication stage.
    auth_token: Option<Arc<dyn AuthToken>>,

    /// When the request started processing.
    started_at: Instant,

    /// Type-erased extension data keyed by type.
    extensions: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl RequestContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self {
            request_id: None,
            logger: None,
            auth_token: None,
            started_at: Instant::now(),
            extensions: HashMap::new(),
        }
    }

    /// Returns the request ID, if one has been assigned.
    #[must_use]
    pub fn request_id(&self) -> Option<RequestId> {
        self.request_id
    }

    /// Sets the request ID.
    pub fn set_request_id(&mut self, request_id: RequestId) {
        self.request_id = Some(request_id);
    }

    /// Returns a new context with the specified request ID.
    #[must_use]
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Returns the request-scoped logger, if one has been assigned.
    #[must_use]
    pub fn logger(&self) -> Option<&Logger> {
        self.logger.as_ref()
    }

    /// Sets the request-scoped logger.
    pub fn set_logger(&mut self, logger: Logger) {
        self.logger = Some(logger);
    }

    /// Returns a new context with the specified logger.
    #[must_use]
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Returns the caller's auth token, if one has been stored.
    #[must_use]
    pub fn auth_token(&self) -> Option<&Arc<dyn AuthToken>> {
        self.auth_token.as_ref()
    }

    /// Returns the auth token downcast to a concrete token type.
    ///
    /// Returns `None` when no token is stored or when the stored token is
    /// of a different type.
    #[must_use]
    pub fn auth_token_as<T: AuthToken>(&self) -> Option<&T> {
        self.auth_token
            .as_deref()
            .and_then(|token| token.as_any().downcast_ref::<T>())
    }

    /// Stores the caller's auth token.
    ///
    /// The token is stored as given; validation belongs to whoever issued it.
    pub fn set_auth_token(&mut self, token: Arc<dyn AuthToken>) {
        self.auth_token = Some(token);
    }

    /// Returns a new context with the specified auth token.
    #[must_use]
    pub fn with_auth_token(mut self, token: Arc<dyn AuthToken>) -> Self {
        self.auth_token = Some(token);
        self
    }

    /// Returns when the request started processing.
    #[must_use]
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Returns the elapsed time since the request started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Stores a typed extension value, replacing any previous value of
    /// the same type.
    ///
    /// # Example
    ///
    /// ```
    /// use quiver_core::RequestContext;
    ///
    /// struct Tenant(&'static str);
    ///
    /// let mut ctx = RequestContext::new();
    /// ctx.set_extension(Tenant("icaa"));
    /// assert_eq!(ctx.get_extension::<Tenant>().map(|t| t.0), Some("icaa"));
    /// ```
    pub fn set_extension<T: Send + Sync + 'static>(&mut self, value: T) {
        self.extensions.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Retrieves a typed extension value.
    #[must_use]
    pub fn get_extension<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Removes and returns a typed extension value.
    pub fn remove_extension<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.extensions
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|b| *b)
    }

    /// Checks if an extension of the given type exists.
    #[must_use]
    pub fn has_extension<T: Send + Sync + 'static>(&self) -> bool {
        self.extensions.contains_key(&TypeId::of::<T>())
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("request_id", &self.request_id)
            .field("logger", &self.logger)
            .field("auth_token", &self.auth_token)
            .field("started_at", &self.started_at)
            .field("extensions", &self.extensions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;

    #[derive(Debug)]
    struct Jwt {
        subject: String,
    }

    impl AuthToken for Jwt {
        fn subject(&self) -> &str {
            &self.subject
        }

        fn expires_at(&self) -> Option<SystemTime> {
            None
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[derive(Debug)]
    struct ApiKey;

    impl AuthToken for ApiKey {
        fn subject(&self) -> &str {
            "service"
        }

        fn expires_at(&self) -> Option<SystemTime> {
            None
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_request_id_new_generates_unique_ids() {
        let id1 = RequestId::new();
        let id2 = RequestId::new();
        assert_ne!(id1, id2, "Each RequestId should be unique");
    }

    #[test]
    fn test_request_id_display() {
        let id = RequestId::new();
        let display = id.to_string();
        assert_eq!(display.len(), 36, "UUID string should be 36 characters");
        assert_eq!(id.as_uuid().get_version_num(), 7);
    }

    #[test]
    fn test_request_id_from_uuid() {
        let uuid = Uuid::now_v7();
        let id = RequestId::from_uuid(uuid);
        assert_eq!(*id.as_uuid(), uuid);
        assert_eq!(Uuid::from(id), uuid);
    }

    #[test]
    fn test_request_id_serializes_as_plain_string() {
        let id = RequestId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
    }

    #[test]
    fn test_new_context_is_empty() {
        let ctx = RequestContext::new();
        assert!(ctx.request_id().is_none());
        assert!(ctx.logger().is_none());
        assert!(ctx.auth_token().is_none());
    }

    #[test]
    fn test_set_and_get_request_id() {
        let id = RequestId::new();
        let ctx = RequestContext::new().with_request_id(id);
        assert_eq!(ctx.request_id(), Some(id));
    }

    #[test]
    fn test_set_and_get_logger() {
        let mut ctx = RequestContext::new();
        ctx.set_logger(Logger::disabled());
        assert!(ctx.logger().is_some());
    }

    #[test]
    fn test_auth_token_roundtrip() {
        let ctx = RequestContext::new().with_auth_token(Arc::new(Jwt {
            subject: "archer-42".to_string(),
        }));

        let token = ctx.auth_token().unwrap();
        assert_eq!(token.subject(), "archer-42");
        assert_eq!(ctx.auth_token_as::<Jwt>().unwrap().subject, "archer-42");
    }

    #[test]
    fn test_auth_token_wrong_type_is_absent() {
        let ctx = RequestContext::new().with_auth_token(Arc::new(ApiKey));

        assert!(ctx.auth_token().is_some());
        assert!(ctx.auth_token_as::<Jwt>().is_none());
        assert!(ctx.auth_token_as::<ApiKey>().is_some());
    }

    #[test]
    fn test_auth_token_missing_is_absent() {
        let ctx = RequestContext::new();
        assert!(ctx.auth_token_as::<Jwt>().is_none());
    }

    #[test]
    fn test_extensions() {
        #[derive(Debug, Clone, PartialEq)]
        struct MyExtension {
            value: i32,
        }

        let mut ctx = RequestContext::new();
        assert!(!ctx.has_extension::<MyExtension>());
        assert!(ctx.get_extension::<MyExtension>().is_none());

        ctx.set_extension(MyExtension { value: 42 });
        assert!(ctx.has_extension::<MyExtension>());
        assert_eq!(ctx.get_extension::<MyExtension>(), Some(&MyExtension { value: 42 }));

        let removed = ctx.remove_extension::<MyExtension>();
        assert_eq!(removed, Some(MyExtension { value: 42 }));
        assert!(!ctx.has_extension::<MyExtension>());
    }

    #[test]
    fn test_elapsed_time() {
        let ctx = RequestContext::new();
        std::thread::sleep(Duration::from_millis(10));
        assert!(ctx.elapsed() >= Duration::from_millis(10));
    }
}
