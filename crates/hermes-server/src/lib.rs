//! # Hermes Server
//!
//! HTTP serving for Hermes:
//!
//! - [`Router`]: method + path dispatch to endpoints, with standard `404`
//!   and `405` error bodies
//! - [`Server`]: hyper HTTP/1.1 on Tokio with per-request timeouts and
//!   graceful shutdown
//!
//! The router is usable without the server, which is how `hermes-test`
//! drives it in memory.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod router;
pub mod server;
pub mod shutdown;

pub use config::{ServerConfig, ServerConfigBuilder, DEFAULT_HTTP_ADDR};
pub use error::ServerError;
pub use hermes_router::{InsertError, Params};
pub use router::Router;
pub use server::Server;
pub use shutdown::{ConnectionToken, ConnectionTracker, ShutdownSignal};
