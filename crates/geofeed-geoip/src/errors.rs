//! GeoIP error types.

use std::net::IpAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when opening the database or resolving an address.
#[derive(Debug, Error)]
pub enum GeoipError {
    /// The database file could not be opened or is not a valid MaxMind DB.
    #[error("failed to open GeoIP database {}: {source}", path.display())]
    Open {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying reader error.
        source: maxminddb::MaxMindDBError,
    },
    /// The address has no usable location in the database.
    #[error("no location for address {0}")]
    AddressNotFound(IpAddr),
    /// The lookup itself failed (corrupt database, decoding error).
    #[error("GeoIP lookup failed: {0}")]
    Lookup(maxminddb::MaxMindDBError),
}

/// Result type for GeoIP operations.
pub type Result<T> = std::result::Result<T, GeoipError>;
