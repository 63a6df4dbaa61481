//! Middleware chain composition.
//!
//! A [`Pipeline`] is built once at startup from an ordered list of
//! middleware and a base [`Handler`]. It is immutable afterwards and can be
//! shared across any number of concurrent requests.
//!
//! ## Ordering
//!
//! The first middleware added is the outermost. For `[m0, m1, m2]` around a
//! router `R`, a request is processed as `m0(m1(m2(R)))`: `m0` sees the
//! request first and the response last.

use crate::middleware::{BoxFuture, Handler, Middleware, Next};
use crate::types::{Request, Response};
use quiver_core::RequestContext;
use std::sync::Arc;

/// A type-erased middleware that can be stored in a vector.
pub type BoxedMiddleware = Arc<dyn Middleware>;

/// An ordered middleware chain around a base handler.
///
/// # Example
///
/// ```
/// use quiver_middleware::{handler_fn, FnMiddleware, Pipeline, Response, ResponseExt};
/// use http::StatusCode;
///
/// let pipeline = Pipeline::builder()
///     .layer(FnMiddleware::new("passthrough", |ctx, request, next| {
///         Box::pin(async move { next.run(ctx, request).await })
///     }))
///     .build(handler_fn(|_ctx, _req| {
///         Box::pin(async { Response::text(StatusCode::OK, "ok") })
///     }));
///
/// assert_eq!(pipeline.stage_count(), 1);
/// ```
pub struct Pipeline {
    /// Middleware stages, outermost first
    stages: Vec<BoxedMiddleware>,

    /// The base handler the chain ends in
    endpoint: Arc<dyn Handler>,
}

impl Pipeline {
    /// Creates a new pipeline builder.
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Wraps `router` in `middlewares`, the first element outermost.
    #[must_use]
    pub fn compose<H: Handler>(router: H, middlewares: Vec<BoxedMiddleware>) -> Self {
        Self {
            stages: middlewares,
            endpoint: Arc::new(router),
        }
    }

    /// Processes a request with a fresh [`RequestContext`].
    pub async fn handle(&self, request: Request) -> Response {
        let mut ctx = RequestContext::new();
        self.process(&mut ctx, request).await
    }

    /// Processes a request through every stage and then the base handler.
    pub async fn process(&self, ctx: &mut RequestContext, request: Request) -> Response {
        self.build_chain().run(ctx, request).await
    }

    // Built back to front so the first stage ends up outermost.
    fn build_chain(&self) -> Next<'_> {
        let mut next = Next::endpoint(self.endpoint.as_ref());

        for middleware in self.stages.iter().rev() {
            next = Next::new(middleware.as_ref(), next);
        }

        next
    }

    /// Returns the names of all middleware stages in order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|mw| mw.name()).collect()
    }

    /// Returns the number of middleware stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }
}

impl Handler for Pipeline {
    fn call<'a>(&'a self, ctx: &'a mut RequestContext, request: Request) -> BoxFuture<'a, Response> {
        Box::pin(self.process(ctx, request))
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish_non_exhaustive()
    }
}

/// Builder for constructing a [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    stages: Vec<BoxedMiddleware>,
}

impl PipelineBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Appends a middleware inside every stage added so far.
    #[must_use]
    pub fn layer<M: Middleware>(mut self, middleware: M) -> Self {
        self.stages.push(Arc::new(middleware));
        self
    }

    /// Appends an already shared middleware.
    #[must_use]
    pub fn layer_arc(mut self, middleware: BoxedMiddleware) -> Self {
        self.stages.push(middleware);
        self
    }

    /// Builds the pipeline around `router`.
    #[must_use]
    pub fn build<H: Handler>(self, router: H) -> Pipeline {
        Pipeline::compose(router, self.stages)
    }
}
