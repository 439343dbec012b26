//! # geofeed-geoip
//!
//! IP-to-coordinates resolution.
//!
//! [`LocationResolver`] is the seam the ingest pipeline calls through;
//! [`MaxMindResolver`] is the production implementation, reading the same
//! MaxMind City database format the rest of the GeoIP ecosystem uses.

#![deny(unsafe_code)]

pub mod errors;
pub mod maxmind;
pub mod resolver;

pub use errors::{GeoipError, Result};
pub use maxmind::MaxMindResolver;
pub use resolver::LocationResolver;
