//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` and `#[serde(default)]`
//! so a partial settings file is valid — missing fields get their compiled
//! default during deserialization.

use serde::{Deserialize, Serialize};

/// Root settings type for the geofeed server.
///
/// Loaded from `~/.geofeed/settings.json` with defaults applied for missing
/// fields; `GEOFEED_*` environment variables override specific values.
///
/// # JSON Format
///
/// ```json
/// {
///   "server": { "host": "0.0.0.0", "port": 8080 },
///   "ingest": { "logFile": "/var/log/access.log" }
/// }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeofeedSettings {
    /// Settings schema version.
    pub version: String,
    /// Server network settings.
    pub server: ServerSettings,
    /// Log-file ingestion settings.
    pub ingest: IngestSettings,
    /// GeoIP database settings.
    pub geoip: GeoipSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl Default for GeofeedSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            server: ServerSettings::default(),
            ingest: IngestSettings::default(),
            geoip: GeoipSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

/// Server network settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Host to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Log-file ingestion settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IngestSettings {
    /// Path of the log file to follow. Required — there is no useful
    /// default; the binary refuses to start without one.
    pub log_file: String,
    /// Fallback re-check interval while waiting for appended data, in
    /// milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            log_file: String::new(),
            poll_interval_ms: 500,
        }
    }
}

/// GeoIP database settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeoipSettings {
    /// Path to the MaxMind City database.
    pub database_path: String,
}

impl Default for GeoipSettings {
    fn default() -> Self {
        Self {
            database_path: "GeoLite2-City.mmdb".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Minimum level for stderr output (`error`..`trace`).
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
