//! Ingest error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while opening or following the log file.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The log file could not be opened.
    #[error("failed to open log file {}: {source}", path.display())]
    Open {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The filesystem watcher could not be set up.
    #[error("failed to watch log file {}: {source}", path.display())]
    Watch {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying watcher error.
        source: notify::Error,
    },
    /// An I/O error while reading or seeking the followed file.
    #[error("I/O error while following log file: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ingest operations.
pub type Result<T> = std::result::Result<T, IngestError>;
