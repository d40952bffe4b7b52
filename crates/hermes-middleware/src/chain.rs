//! Composition of middleware around an endpoint.
//!
//! A [`Chain`] is built once, at registration time, and then shared by every
//! request routed to it. The first middleware in the list is the outermost
//! wrapper: it sees the request first and the response last.
//!
//! ```text
//! Request → M1 → M2 → … → Mn → Endpoint
//!                                 ↓
//! Response ← M1 ← M2 ← … ← Mn ←──┘
//! ```

use crate::middleware::{BoxFuture, BoxedEndpoint, BoxedMiddleware, Endpoint, Middleware, Next};
use crate::types::{Request, Response};
use hermes_core::RpcContext;
use std::fmt;

/// An ordered list of middleware wrapping a terminal endpoint.
#[derive(Clone)]
pub struct Chain {
    middleware: Vec<BoxedMiddleware>,
    endpoint: BoxedEndpoint,
}

impl Chain {
    /// Wraps `endpoint` with `middleware`, first element outermost.
    ///
    /// An empty list yields a chain equivalent to the endpoint alone.
    pub fn new(middleware: Vec<BoxedMiddleware>, endpoint: BoxedEndpoint) -> Self {
        Self {
            middleware,
            endpoint,
        }
    }

    /// Runs a request through the chain.
    pub async fn run(&self, ctx: RpcContext, request: Request) -> Response {
        self.build_next().run(ctx, request).await
    }

    fn build_next(&self) -> Next<'_> {
        let mut next = Next::endpoint(self.endpoint.as_ref());
        for middleware in self.middleware.iter().rev() {
            next = Next::new(middleware.as_ref(), next);
        }
        next
    }

    /// Names of the middleware in execution order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.middleware.iter().map(|mw| mw.name()).collect()
    }

    /// Number of middleware stages, excluding the endpoint.
    #[must_use]
    pub fn len(&self) -> usize {
        self.middleware.len()
    }

    /// Returns `true` if the chain has no middleware.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.middleware.is_empty()
    }
}

impl Endpoint for Chain {
    fn call<'a>(&'a self, ctx: RpcContext, request: Request) -> BoxFuture<'a, Response> {
        Box::pin(self.run(ctx, request))
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("stages", &self.stage_names())
            .finish_non_exhaustive()
    }
}
