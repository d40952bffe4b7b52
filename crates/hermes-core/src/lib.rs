//! # Hermes Core
//!
//! Core types and traits for the Hermes RPC dispatch layer.
//!
//! This crate provides the foundational types used throughout Hermes:
//!
//! - [`RpcError`] - Error carrying an HTTP status and a client-facing message
//! - [`RpcContext`] - Immutable per-request context (handler name, request id, values)
//! - [`RequestId`] - UUID v7 request identifier
//! - [`RpcHandler`] - The typed handler contract
//! - [`Schema`] - Field-level shape description used by the documentation endpoint

#![doc(html_root_url = "https://docs.rs/hermes-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;
mod handler;
pub mod schema;

pub use context::{RequestId, RpcContext};
pub use error::{RpcError, RpcResult, INTERNAL_SERVER_ERROR_MESSAGE};
pub use handler::{handler_fn, short_type_name, FnHandler, RpcHandler};
pub use schema::{Empty, FieldKind, FieldSchema, NoContent, Schema};
