//! Server error types.

use thiserror::Error;

/// Errors that can occur when starting the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listener could not bind its address.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// The address that was attempted.
        addr: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Any other I/O failure during startup.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;
