//! # Hermes
//!
//! **Typed JSON request/response RPC over HTTP**
//!
//! Hermes binds typed handlers to HTTP method + path pairs. For every
//! registered operation it:
//!
//! - decodes the input from the query string (`GET`, `DELETE`) or the JSON
//!   body (everything else)
//! - runs the request through an ordered middleware chain
//! - encodes the output as JSON, or turns any failure into a
//!   `{"HTTPCode": .., "Message": ..}` error body
//! - records the operation's input and output shape for `GET /rpc/docs`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hermes::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Deserialize, Schema)]
//! #[schema(crate = "hermes::core")]
//! struct Hello { name: String }
//!
//! #[derive(Serialize, Schema)]
//! #[schema(crate = "hermes::core")]
//! struct Greeting { greeting: String }
//!
//! struct Greet;
//!
//! impl RpcHandler<Hello, Greeting> for Greet {
//!     async fn handle(&self, _ctx: &RpcContext, input: Hello) -> anyhow::Result<Greeting> {
//!         Ok(Greeting { greeting: format!("Hello, {}!", input.name) })
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut rpc = Rpc::new();
//!     rpc.register_middleware(Arc::new(RequestIdMiddleware::new()));
//!
//!     let mut router = Router::new();
//!     rpc.register(&mut router, Method::GET, "/greet", Greet, vec![])?;
//!     rpc.register_docs(&mut router)?;
//!
//!     Server::new(ServerConfig::default(), router).serve().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Request flow
//!
//! ```text
//! Request → HandlerName → defaults… → per-operation… → decode → handler → encode
//!                                                                           ↓
//! Response ←──────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub use hermes_config as config;
pub use hermes_core as core;
pub use hermes_middleware as middleware;
pub use hermes_router as router;
pub use hermes_rpc as rpc;
pub use hermes_server as server;
pub use hermes_telemetry as telemetry;

pub use hermes_macros::Schema;

pub use http;

/// Common imports for services.
///
/// ```rust,ignore
/// use hermes::prelude::*;
/// ```
pub mod prelude {
    pub use std::sync::Arc;

    pub use hermes_core::{
        handler_fn, Empty, NoContent, RequestId, RpcContext, RpcError, RpcHandler, RpcResult,
        Schema,
    };
    pub use hermes_macros::Schema;

    pub use hermes_middleware::{
        from_fn, BoxFuture, BoxedMiddleware, Middleware, Next, Request, RequestIdMiddleware,
        Response, ResponseExt, TelemetryMiddleware,
    };

    pub use hermes_rpc::{handle_error, Rpc};

    pub use http::{Method, StatusCode};
    pub use hermes_server::{Router, Server, ServerConfig, ShutdownSignal};

    pub use hermes_config::{ConfigLoader, HermesConfig};
}
