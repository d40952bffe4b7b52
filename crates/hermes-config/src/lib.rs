//! Layered configuration for Hermes services.
//!
//! [`HermesConfig`] holds the server, logging, metrics and documentation
//! settings. [`ConfigLoader`] builds it from defaults, TOML or JSON files,
//! a `.env` file and `PREFIX__SECTION__KEY` environment variables. Unknown
//! fields are errors, not silently ignored.
//!
//! ```no_run
//! use hermes_config::ConfigLoader;
//!
//! # fn main() -> Result<(), hermes_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_optional_file("hermes.toml")?
//!     .with_env_prefix("HERMES")
//!     .load()?;
//!
//! let server = config.server_config();
//! let logging = config.log_config();
//! # Ok(())
//! # }
//! ```
//!
//! # File format
//!
//! ```toml
//! service_name = "greeter"
//!
//! [server]
//! http_addr = "0.0.0.0:8080"
//! request_timeout_ms = 30000
//! shutdown_timeout_secs = 30
//! keep_alive = true
//! max_body_size = 1048576
//!
//! [logging]
//! level = "info"
//! format = "json"
//!
//! [metrics]
//! enabled = true
//!
//! [docs]
//! enabled = true
//! path = "/rpc/docs"
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::HermesConfig;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{DocsSection, LogFormat, LoggingSection, MetricsSection, ServerSection};
