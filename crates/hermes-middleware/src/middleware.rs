//! Core middleware and endpoint traits.
//!
//! An [`Endpoint`] turns a request into a response. A [`Middleware`] wraps the
//! rest of a chain: it receives the request together with a [`Next`] handle
//! and decides whether, and how, to continue.
//!
//! # Example
//!
//! ```ignore
//! use hermes_middleware::{BoxFuture, Middleware, Next, Request, Response};
//! use hermes_core::RpcContext;
//!
//! struct LoggingMiddleware;
//!
//! impl Middleware for LoggingMiddleware {
//!     fn name(&self) -> &'static str {
//!         "logging"
//!     }
//!
//!     fn process<'a>(
//!         &'a self,
//!         ctx: RpcContext,
//!         request: Request,
//!         next: Next<'a>,
//!     ) -> BoxFuture<'a, Response> {
//!         Box::pin(async move {
//!             tracing::info!(handler = ?ctx.handler_name(), "request");
//!             let response = next.run(ctx, request).await;
//!             tracing::info!(status = %response.status(), "response");
//!             response
//!         })
//!     }
//! }
//! ```

use crate::types::{Request, Response};
use hermes_core::RpcContext;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A boxed future that returns a response.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A type-erased middleware that can be stored in a vector.
pub type BoxedMiddleware = Arc<dyn Middleware>;

/// A type-erased endpoint.
pub type BoxedEndpoint = Arc<dyn Endpoint>;

/// The terminal stage of a chain.
///
/// Endpoints are shared across concurrent requests and must not keep
/// per-request state in their fields.
pub trait Endpoint: Send + Sync + 'static {
    /// Produces the response for a request.
    fn call<'a>(&'a self, ctx: RpcContext, request: Request) -> BoxFuture<'a, Response>;
}

/// A stage wrapping the remainder of a chain.
///
/// # Invariants
///
/// - Call `next.run()` at most once. Not calling it short-circuits the chain:
///   nothing downstream runs and this stage's response stands.
/// - Per-request state goes into the [`RpcContext`] handed downstream, never
///   into `self`.
pub trait Middleware: Send + Sync + 'static {
    /// Returns the name of this stage, used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Processes the request, usually by delegating to `next`.
    fn process<'a>(
        &'a self,
        ctx: RpcContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response>;
}

/// Handle to the remainder of the chain.
///
/// Consumed by [`Next::run`], so it can be invoked at most once.
pub struct Next<'a> {
    inner: NextInner<'a>,
}

enum NextInner<'a> {
    Chain {
        middleware: &'a dyn Middleware,
        next: Box<Next<'a>>,
    },
    Endpoint(&'a dyn Endpoint),
}

impl<'a> Next<'a> {
    /// A `Next` that runs `middleware`, which in turn receives `next`.
    pub fn new(middleware: &'a dyn Middleware, next: Next<'a>) -> Self {
        Self {
            inner: NextInner::Chain {
                middleware,
                next: Box::new(next),
            },
        }
    }

    /// A terminal `Next` that calls the endpoint.
    pub fn endpoint(endpoint: &'a dyn Endpoint) -> Self {
        Self {
            inner: NextInner::Endpoint(endpoint),
        }
    }

    /// Runs the next stage.
    pub async fn run(self, ctx: RpcContext, request: Request) -> Response {
        match self.inner {
            NextInner::Chain { middleware, next } => {
                middleware.process(ctx, request, *next).await
            }
            NextInner::Endpoint(endpoint) => endpoint.call(ctx, request).await,
        }
    }
}

/// Middleware built from a closure. See [`from_fn`].
pub struct FnMiddleware<F> {
    name: &'static str,
    func: F,
}

/// Creates a middleware from a closure returning a boxed future.
///
/// # Example
///
/// ```ignore
/// let timing = hermes_middleware::from_fn("timing", |ctx, req, next| {
///     Box::pin(async move {
///         let start = std::time::Instant::now();
///         let response = next.run(ctx, req).await;
///         tracing::debug!(elapsed = ?start.elapsed(), "done");
///         response
///     })
/// });
/// ```
pub fn from_fn<F>(name: &'static str, func: F) -> FnMiddleware<F>
where
    F: for<'a> Fn(RpcContext, Request, Next<'a>) -> BoxFuture<'a, Response>
        + Send
        + Sync
        + 'static,
{
    FnMiddleware { name, func }
}

impl<F> Middleware for FnMiddleware<F>
where
    F: for<'a> Fn(RpcContext, Request, Next<'a>) -> BoxFuture<'a, Response>
        + Send
        + Sync
        + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn process<'a>(
        &'a self,
        ctx: RpcContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        (self.func)(ctx, request, next)
    }
}

/// Endpoint built from an async closure. See [`endpoint_fn`].
pub struct FnEndpoint<F> {
    func: F,
}

/// Creates an endpoint from an async closure.
///
/// ```ignore
/// let health = hermes_middleware::endpoint_fn(|_ctx, _req| async {
///     Response::json(StatusCode::OK, Bytes::from_static(b"{}"))
/// });
/// ```
pub fn endpoint_fn<F, Fut>(func: F) -> FnEndpoint<F>
where
    F: Fn(RpcContext, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    FnEndpoint { func }
}

impl<F, Fut> Endpoint for FnEndpoint<F>
where
    F: Fn(RpcContext, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn call<'a>(&'a self, ctx: RpcContext, request: Request) -> BoxFuture<'a, Response> {
        Box::pin((self.func)(ctx, request))
    }
}
