//! Server errors.

use std::net::{AddrParseError, SocketAddr};

use thiserror::Error;

/// Errors that stop the server from starting or running.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The configured address could not be parsed.
    #[error("invalid address '{addr}': {source}")]
    InvalidAddress {
        /// The address as configured.
        addr: String,
        /// The parse failure.
        #[source]
        source: AddrParseError,
    },

    /// Binding the listener failed.
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        /// The address the server tried to bind.
        addr: SocketAddr,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An I/O error on the listening socket.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
