//! # Hermes Test
//!
//! In-memory testing for Hermes routers: requests are dispatched straight to
//! a [`hermes_server::Router`], with no socket and no server.
//!
//! ```rust,ignore
//! use hermes_test::TestClient;
//! use http::StatusCode;
//!
//! #[tokio::test]
//! async fn test_scenario() {
//!     let client = TestClient::new(build_router());
//!
//!     client
//!         .get("/test")
//!         .query("input", "hello")
//!         .send()
//!         .await
//!         .assert_status(StatusCode::OK)
//!         .assert_json(&serde_json::json!({"output": "success"}));
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod request;
mod response;

pub use client::{TestClient, TestClientRequest};
pub use error::TestError;
pub use request::TestRequestBuilder;
pub use response::TestResponse;
