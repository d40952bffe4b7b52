//! Operation registration.

use std::marker::PhantomData;
use std::sync::Arc;

use http::Method;
use serde::{de::DeserializeOwned, Serialize};

use hermes_core::{RpcContext, RpcHandler, Schema};
use hermes_middleware::{
    BoxFuture, BoxedMiddleware, Chain, Endpoint, HandlerNameMiddleware, Request, Response,
};
use hermes_server::{InsertError, Router};
use hermes_telemetry::metrics;

use crate::decode::decode_input;
use crate::docs::{Catalog, DocEntry, DocsEndpoint, DOCS_HANDLER_NAME, DOCS_PATH};
use crate::respond::{encode_output, handle_error};

/// The operation registrar.
///
/// Owns the default middleware applied to every operation and the
/// documentation catalog. Default middleware can only be added through
/// `&mut Rpc`, so it is fixed once the registrar is shared.
///
/// # Example
///
/// ```rust,ignore
/// let mut rpc = Rpc::new();
/// rpc.register_middleware(Arc::new(RequestIdMiddleware::new()));
///
/// let mut router = Router::new();
/// rpc.register(&mut router, Method::GET, "/test", TestHandler, vec![])?;
/// rpc.register_docs(&mut router)?;
/// ```
#[derive(Clone, Default)]
pub struct Rpc {
    defaults: Vec<BoxedMiddleware>,
    catalog: Catalog,
}

impl Rpc {
    /// Creates a registrar with no default middleware.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a middleware to the default list.
    ///
    /// Affects only operations registered afterwards.
    pub fn register_middleware(&mut self, middleware: BoxedMiddleware) -> &mut Self {
        tracing::debug!(middleware = middleware.name(), "default middleware added");
        self.defaults.push(middleware);
        self
    }

    /// Names of the default middleware, in execution order.
    #[must_use]
    pub fn default_middleware(&self) -> Vec<&'static str> {
        self.defaults.iter().map(|mw| mw.name()).collect()
    }

    /// The documentation catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Registers `handler` at `method` + `path` and records its documentation.
    ///
    /// The handler runs inside, from outermost to innermost: the handler name
    /// stage, the default middleware, then `middleware` in the given order.
    ///
    /// `GET` and `DELETE` decode the input from the query string; every other
    /// method decodes it from a JSON body.
    ///
    /// A duplicate method + path is rejected with [`InsertError::Conflict`]
    /// and nothing is recorded.
    pub fn register<H, In, Out>(
        &self,
        router: &mut Router,
        method: Method,
        path: &str,
        handler: H,
        middleware: Vec<BoxedMiddleware>,
    ) -> Result<(), InsertError>
    where
        H: RpcHandler<In, Out>,
        In: DeserializeOwned + Schema + Send + 'static,
        Out: Serialize + Schema + Send + 'static,
    {
        let name = handler.name();
        let entry = DocEntry::new(&method, path, handler.input_schema(), handler.output_schema());
        let endpoint = RpcEndpoint {
            handler,
            _marker: PhantomData,
        };
        let chain = self.chain(name, middleware, Arc::new(endpoint));
        let stages = chain.len();

        router.route(method.clone(), path, Arc::new(chain))?;
        self.catalog.push(entry);

        tracing::debug!(handler = name, %method, path, stages, "operation registered");
        Ok(())
    }

    /// Mounts the documentation endpoint at `GET /rpc/docs`.
    ///
    /// It runs through the default middleware under the handler name
    /// `"RpcDocs"` and lists every operation in the catalog at request time,
    /// including ones registered after this call.
    pub fn register_docs(&self, router: &mut Router) -> Result<(), InsertError> {
        self.register_docs_at(router, DOCS_PATH)
    }

    /// Mounts the documentation endpoint at `GET path`.
    pub fn register_docs_at(&self, router: &mut Router, path: &str) -> Result<(), InsertError> {
        let endpoint = DocsEndpoint::new(self.catalog.clone());
        let chain = self.chain(DOCS_HANDLER_NAME, Vec::new(), Arc::new(endpoint));
        router.route(Method::GET, path, Arc::new(chain))?;

        tracing::debug!(path, "documentation endpoint registered");
        Ok(())
    }

    fn chain(
        &self,
        handler_name: &'static str,
        operation: Vec<BoxedMiddleware>,
        endpoint: Arc<dyn Endpoint>,
    ) -> Chain {
        let mut stages: Vec<BoxedMiddleware> =
            vec![Arc::new(HandlerNameMiddleware::new(handler_name))];
        stages.extend(self.defaults.iter().cloned());
        stages.extend(operation);
        Chain::new(stages, endpoint)
    }
}

impl std::fmt::Debug for Rpc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rpc")
            .field("defaults", &self.default_middleware())
            .field("operations", &self.catalog.len())
            .finish()
    }
}

/// The terminal stage: decode, invoke, encode.
struct RpcEndpoint<H, In, Out> {
    handler: H,
    _marker: PhantomData<fn(In) -> Out>,
}

impl<H, In, Out> Endpoint for RpcEndpoint<H, In, Out>
where
    H: RpcHandler<In, Out>,
    In: DeserializeOwned + Schema + Send + 'static,
    Out: Serialize + Schema + Send + 'static,
{
    fn call<'a>(&'a self, ctx: RpcContext, request: Request) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let input = match decode_input::<In>(&request) {
                Ok(input) => input,
                Err(e) => {
                    let handler = ctx.handler_name().unwrap_or_else(|| self.handler.name());
                    metrics::record_decode_failure(handler, e.source.metric_label());
                    return handle_error(&e.to_rpc_error().into());
                }
            };
            drop(request);

            match self.handler.handle(&ctx, input).await {
                Ok(output) => encode_output(&output),
                Err(err) => handle_error(&err),
            }
        })
    }
}
