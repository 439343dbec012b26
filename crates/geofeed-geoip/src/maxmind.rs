//! MaxMind database-backed resolver.

use std::net::IpAddr;
use std::path::Path;

use geofeed_core::GeoEvent;
use maxminddb::{MaxMindDBError, Reader};
use serde::Deserialize;

use crate::errors::{GeoipError, Result};
use crate::resolver::LocationResolver;

/// The subset of a City record this service cares about.
#[derive(Debug, Deserialize)]
struct CityRecord {
    location: Option<LocationRecord>,
}

#[derive(Debug, Deserialize)]
struct LocationRecord {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// Resolver reading a MaxMind City database (e.g. `GeoLite2-City.mmdb`).
///
/// The reader memory-loads the database once at startup; lookups afterward
/// are lock-free and safe from any thread.
#[derive(Debug)]
pub struct MaxMindResolver {
    reader: Reader<Vec<u8>>,
}

impl MaxMindResolver {
    /// Open a City database file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = Reader::open_readfile(path).map_err(|source| GeoipError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { reader })
    }
}

impl LocationResolver for MaxMindResolver {
    fn resolve(&self, address: IpAddr) -> Result<GeoEvent> {
        let record: CityRecord = match self.reader.lookup(address) {
            Ok(record) => record,
            Err(MaxMindDBError::AddressNotFoundError(_)) => {
                return Err(GeoipError::AddressNotFound(address));
            }
            Err(e) => return Err(GeoipError::Lookup(e)),
        };

        // A record can exist without coordinates; treat that the same as
        // an unknown address rather than plotting it at 0,0.
        let location = record
            .location
            .ok_or(GeoipError::AddressNotFound(address))?;
        match (location.latitude, location.longitude) {
            (Some(latitude), Some(longitude)) => Ok(GeoEvent::new(latitude, longitude)),
            _ => Err(GeoipError::AddressNotFound(address)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such.mmdb");
        let err = MaxMindResolver::open(&path).unwrap_err();
        assert!(matches!(err, GeoipError::Open { .. }));
        assert!(err.to_string().contains("no_such.mmdb"));
    }

    #[test]
    fn open_garbage_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.mmdb");
        std::fs::write(&path, b"definitely not a maxmind database").unwrap();
        assert!(MaxMindResolver::open(&path).is_err());
    }

    #[test]
    fn city_record_deserializes_location() {
        let record: CityRecord = serde_json::from_str(
            r#"{"location": {"latitude": 40.7, "longitude": -74.0}}"#,
        )
        .unwrap();
        let location = record.location.unwrap();
        assert_eq!(location.latitude, Some(40.7));
        assert_eq!(location.longitude, Some(-74.0));
    }

    #[test]
    fn city_record_tolerates_missing_location() {
        let record: CityRecord = serde_json::from_str("{}").unwrap();
        assert!(record.location.is_none());

        let record: CityRecord =
            serde_json::from_str(r#"{"location": {"latitude": 40.7}}"#).unwrap();
        assert!(record.location.unwrap().longitude.is_none());
    }
}
