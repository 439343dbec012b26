//! The resolution seam between the ingest pipeline and the GeoIP backend.

use std::net::IpAddr;

use geofeed_core::GeoEvent;

use crate::errors::Result;

/// Resolves an IP address to geographic coordinates.
///
/// Implementations are read-only and safe for concurrent calls. A missing
/// address is reported as [`GeoipError::AddressNotFound`], distinct from
/// database or I/O failures.
///
/// [`GeoipError::AddressNotFound`]: crate::errors::GeoipError::AddressNotFound
pub trait LocationResolver: Send + Sync {
    /// Look up the coordinates for `address`.
    fn resolve(&self, address: IpAddr) -> Result<GeoEvent>;
}
