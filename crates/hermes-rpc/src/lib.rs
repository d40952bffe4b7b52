//! # Hermes RPC
//!
//! Binds typed handlers to HTTP routes.
//!
//! [`Rpc::register`] wraps an [`RpcHandler`](hermes_core::RpcHandler) in a
//! terminal endpoint that decodes the input, invokes the handler and encodes
//! the output, surrounds it with middleware, mounts it on a
//! [`Router`](hermes_server::Router) and records a [`DocEntry`] for the
//! documentation endpoint.
//!
//! ## Request Pipeline
//!
//! ```text
//! GET/DELETE: query string ─┐
//!                           ├─ decode In ── 400 on failure
//! other:      JSON body ────┘
//!                 │
//!          handler.handle(ctx, input)
//!                 │
//!       Ok(out) → 200 JSON      Err(e) → handle_error(e)
//! ```
//!
//! Every response, success or error, is `application/json`. Errors use the
//! body `{"HTTPCode": <status>, "Message": <message>}`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use hermes_core::{RpcContext, RpcHandler};
//! use hermes_macros::Schema;
//! use hermes_rpc::Rpc;
//! use hermes_server::Router;
//! use http::Method;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Deserialize, Schema)]
//! struct TestInput { input: String }
//!
//! #[derive(Serialize, Schema)]
//! struct TestOutput { output: String }
//!
//! struct TestHandler;
//!
//! impl RpcHandler<TestInput, TestOutput> for TestHandler {
//!     async fn handle(&self, _ctx: &RpcContext, _input: TestInput) -> anyhow::Result<TestOutput> {
//!         Ok(TestOutput { output: "success".to_string() })
//!     }
//! }
//!
//! let rpc = Rpc::new();
//! let mut router = Router::new();
//! rpc.register(&mut router, Method::GET, "/test", TestHandler, vec![])?;
//! rpc.register_docs(&mut router)?;
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod decode;
pub mod docs;
pub mod register;
pub mod respond;

pub use decode::{DecodeError, InputSource};
pub use docs::{Catalog, DocEntry, DocsEndpoint, DOCS_HANDLER_NAME, DOCS_PATH};
pub use register::Rpc;
pub use respond::{encode_output, handle_error};
