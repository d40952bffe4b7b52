//! # Hermes Middleware
//!
//! Onion-style middleware chains for Hermes operations.
//!
//! A [`Chain`] wraps a terminal [`Endpoint`] with an ordered list of
//! [`Middleware`]. The first middleware is the outermost: it sees the request
//! first and the response last. Any stage may return without calling
//! [`Next::run`], which short-circuits everything inside it.
//!
//! ```text
//! Request → HandlerName → M1 → M2 → Endpoint
//!                                      ↓
//! Response ← HandlerName ← M1 ← M2 ←───┘
//! ```
//!
//! Per-request state travels in the immutable [`hermes_core::RpcContext`]:
//! a stage derives an enriched copy and passes it downstream.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use bytes::Bytes;
//! use http::StatusCode;
//! use hermes_middleware::{endpoint_fn, from_fn, Chain, Response, ResponseExt};
//!
//! let endpoint = endpoint_fn(|_ctx, _req| async {
//!     Response::json(StatusCode::OK, Bytes::from_static(b"{}"))
//! });
//! let timing = from_fn("timing", |ctx, req, next| {
//!     Box::pin(async move { next.run(ctx, req).await })
//! });
//!
//! let chain = Chain::new(vec![Arc::new(timing)], Arc::new(endpoint));
//! assert_eq!(chain.stage_names(), vec!["timing"]);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chain;
pub mod middleware;
pub mod stages;
pub mod types;

pub use chain::Chain;
pub use middleware::{
    endpoint_fn, from_fn, BoxFuture, BoxedEndpoint, BoxedMiddleware, Endpoint, FnEndpoint,
    FnMiddleware, Middleware, Next,
};
pub use stages::{HandlerNameMiddleware, RequestIdMiddleware, TelemetryMiddleware};
pub use types::{Request, Response, ResponseExt, APPLICATION_JSON};
