//! Core middleware and handler traits.
//!
//! A [`Middleware`] receives the request context, the request and a [`Next`]
//! continuation. It may rewrite the request, observe the response, or
//! answer the request itself without calling `next`.
//!
//! # Example
//!
//! ```
//! use quiver_middleware::{BoxFuture, Middleware, Next, Request, RequestContext, Response};
//!
//! struct Timing;
//!
//! impl Middleware for Timing {
//!     fn name(&self) -> &'static str {
//!         "timing"
//!     }
//!
//!     fn process<'a>(
//!         &'a self,
//!         ctx: &'a mut RequestContext,
//!         request: Request,
//!         next: Next<'a>,
//!     ) -> BoxFuture<'a, Response> {
//!         Box::pin(async move {
//!             let start = std::time::Instant::now();
//!             let response = next.run(ctx, request).await;
//!             tracing::debug!(elapsed = ?start.elapsed(), "request finished");
//!             response
//!         })
//!     }
//! }
//! ```

use crate::types::{Request, Response};
use quiver_core::RequestContext;
use std::future::Future;
use std::pin::Pin;

/// A boxed future that returns a response.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A request-handling decorator.
///
/// # Invariants
///
/// - Middleware MUST call `next.run()` at most once
/// - Middleware that does not call `next.run()` answers the request itself
/// - Middleware holds no per-request state; anything request-scoped goes in
///   the [`RequestContext`]
pub trait Middleware: Send + Sync + 'static {
    /// Returns the name of this middleware, used for logging and introspection.
    fn name(&self) -> &'static str;

    /// Process the request through this middleware.
    fn process<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response>;
}

/// The terminal stage of a chain: usually the application's router.
pub trait Handler: Send + Sync + 'static {
    /// Produces the response for a request.
    fn call<'a>(&'a self, ctx: &'a mut RequestContext, request: Request) -> BoxFuture<'a, Response>;
}

/// A [`Handler`] backed by a closure. Created by [`handler_fn`].
pub struct HandlerFn<F> {
    func: F,
}

/// Wraps a closure as a [`Handler`].
///
/// The closure returns a `'static` future, so anything it needs from the
/// context must be copied out before the `async` block.
///
/// ```
/// use quiver_middleware::{handler_fn, Response, ResponseExt};
/// use http::StatusCode;
///
/// let router = handler_fn(|ctx, request| {
///     let id = ctx.request_id();
///     Box::pin(async move {
///         Response::text(StatusCode::OK, format!("{} {:?}", request.uri().path(), id))
///     })
/// });
/// ```
pub fn handler_fn<F>(func: F) -> HandlerFn<F>
where
    F: Fn(&mut RequestContext, Request) -> BoxFuture<'static, Response> + Send + Sync + 'static,
{
    HandlerFn { func }
}

impl<F> Handler for HandlerFn<F>
where
    F: Fn(&mut RequestContext, Request) -> BoxFuture<'static, Response> + Send + Sync + 'static,
{
    fn call<'a>(&'a self, ctx: &'a mut RequestContext, request: Request) -> BoxFuture<'a, Response> {
        (self.func)(ctx, request)
    }
}

impl<H: Handler + ?Sized> Handler for std::sync::Arc<H> {
    fn call<'a>(&'a self, ctx: &'a mut RequestContext, request: Request) -> BoxFuture<'a, Response> {
        (**self).call(ctx, request)
    }
}

/// Continuation that invokes the rest of the chain.
///
/// Consumed by [`Next::run`], so it can be invoked at most once.
pub struct Next<'a> {
    inner: NextInner<'a>,
}

enum NextInner<'a> {
    /// More middleware to process
    Chain {
        middleware: &'a dyn Middleware,
        next: Box<Next<'a>>,
    },
    /// End of chain
    Endpoint(&'a dyn Handler),
}

impl<'a> Next<'a> {
    /// Creates a `Next` that runs `middleware` before `next`.
    pub fn new(middleware: &'a dyn Middleware, next: Next<'a>) -> Self {
        Self {
            inner: NextInner::Chain {
                middleware,
                next: Box::new(next),
            },
        }
    }

    /// Creates a terminal `Next` that invokes `handler`.
    pub fn endpoint(handler: &'a dyn Handler) -> Self {
        Self {
            inner: NextInner::Endpoint(handler),
        }
    }

    /// Invokes the next middleware or the terminal handler.
    pub async fn run(self, ctx: &mut RequestContext, request: Request) -> Response {
        match self.inner {
            NextInner::Chain { middleware, next } => middleware.process(ctx, request, *next).await,
            NextInner::Endpoint(handler) => handler.call(ctx, request).await,
        }
    }
}

/// A middleware defined by a closure.
///
/// # Example
///
/// ```
/// use quiver_middleware::FnMiddleware;
///
/// let passthrough = FnMiddleware::new("passthrough", |ctx, request, next| {
///     Box::pin(async move { next.run(ctx, request).await })
/// });
/// ```
pub struct FnMiddleware<F> {
    name: &'static str,
    func: F,
}

impl<F> FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut RequestContext, Request, Next<'a>) -> BoxFuture<'a, Response>
        + Send
        + Sync
        + 'static,
{
    /// Creates a new function-based middleware.
    pub const fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F> Middleware for FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut RequestContext, Request, Next<'a>) -> BoxFuture<'a, Response>
        + Send
        + Sync
        + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        (self.func)(ctx, request, next)
    }
}
