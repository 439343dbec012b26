//! The geolocation event value type.

use serde::{Deserialize, Serialize};

/// A resolved geographic position, produced once per successfully parsed
/// and resolved log line.
///
/// Serializes to exactly `{"latitude": <float>, "longitude": <float>}` —
/// clients depend on this two-field shape with numeric (not string)
/// encoding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoEvent {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl GeoEvent {
    /// Create an event from a coordinate pair.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}
