//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`GeofeedSettings::default()`]
//! 2. If `~/.geofeed/settings.json` exists, deep-merge user values over
//!    defaults
//! 3. Apply `GEOFEED_*` environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::GeofeedSettings;

/// Resolve the path to the settings file (`~/.geofeed/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".geofeed").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<GeofeedSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<GeofeedSettings> {
    let defaults = serde_json::to_value(GeofeedSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: GeofeedSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply environment variable overrides to loaded settings.
///
/// Integers must be valid and within range; invalid values are silently
/// ignored (fall back to file/default).
pub fn apply_env_overrides(settings: &mut GeofeedSettings) {
    if let Some(v) = read_env_string("GEOFEED_HOST") {
        settings.server.host = v;
    }
    if let Some(v) = read_env_u16("GEOFEED_PORT", 1, 65535) {
        settings.server.port = v;
    }
    if let Some(v) = read_env_string("GEOFEED_LOG_FILE") {
        settings.ingest.log_file = v;
    }
    if let Some(v) = read_env_u64("GEOFEED_POLL_INTERVAL_MS", 10, 60_000) {
        settings.ingest.poll_interval_ms = v;
    }
    if let Some(v) = read_env_string("GEOFEED_GEOIP_DB") {
        settings.geoip.database_path = v;
    }
    if let Some(v) = read_env_string("GEOFEED_LOG_LEVEL") {
        settings.logging.level = v;
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a `u16` within `[min, max]`.
pub fn parse_u16(val: &str, min: u16, max: u16) -> Option<u16> {
    val.trim()
        .parse::<u16>()
        .ok()
        .filter(|v| (min..=max).contains(v))
}

/// Parse a string as a `u64` within `[min, max]`.
pub fn parse_u64(val: &str, min: u64, max: u64) -> Option<u64> {
    val.trim()
        .parse::<u64>()
        .ok()
        .filter(|v| (min..=max).contains(v))
}

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn read_env_u16(name: &str, min: u16, max: u16) -> Option<u16> {
    std::env::var(name)
        .ok()
        .and_then(|v| parse_u16(&v, min, max))
}

fn read_env_u64(name: &str, min: u64, max: u64) -> Option<u64> {
    std::env::var(name)
        .ok()
        .and_then(|v| parse_u64(&v, min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deep_merge_objects_recursively() {
        let target = serde_json::json!({"server": {"host": "0.0.0.0", "port": 8080}});
        let source = serde_json::json!({"server": {"port": 9090}});
        let merged = deep_merge(target, source);
        assert_eq!(merged["server"]["host"], "0.0.0.0");
        assert_eq!(merged["server"]["port"], 9090);
    }

    #[test]
    fn deep_merge_skips_nulls() {
        let target = serde_json::json!({"a": 1, "b": 2});
        let source = serde_json::json!({"a": null, "b": 3});
        let merged = deep_merge(target, source);
        assert_eq!(merged["a"], 1);
        assert_eq!(merged["b"], 3);
    }

    #[test]
    fn deep_merge_replaces_primitives_and_arrays() {
        let target = serde_json::json!({"xs": [1, 2, 3], "y": "old"});
        let source = serde_json::json!({"xs": [9], "y": "new"});
        let merged = deep_merge(target, source);
        assert_eq!(merged["xs"], serde_json::json!([9]));
        assert_eq!(merged["y"], "new");
    }

    #[test]
    fn deep_merge_adds_new_keys() {
        let target = serde_json::json!({"a": 1});
        let source = serde_json::json!({"b": 2});
        let merged = deep_merge(target, source);
        assert_eq!(merged["a"], 1);
        assert_eq!(merged["b"], 2);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings =
            load_settings_from_path(&dir.path().join("no_such.json")).unwrap();
        assert_eq!(settings.server.port, GeofeedSettings::default().server.port);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"server": {"port": 9191}, "ingest": {"logFile": "/tmp/access.log"}}"#,
        )
        .unwrap();

        let settings = load_settings_from_path(&path).unwrap();
        assert_eq!(settings.server.port, 9191);
        assert_eq!(settings.ingest.log_file, "/tmp/access.log");
        // Untouched sections keep defaults
        assert_eq!(settings.geoip.database_path, "GeoLite2-City.mmdb");
    }

    #[test]
    fn invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(load_settings_from_path(&path).is_err());
    }

    #[test]
    fn parse_u16_enforces_range() {
        assert_eq!(parse_u16("8080", 1, 65535), Some(8080));
        assert_eq!(parse_u16("0", 1, 65535), None);
        assert_eq!(parse_u16(" 443 ", 1, 65535), Some(443));
        assert_eq!(parse_u16("not a port", 1, 65535), None);
        assert_eq!(parse_u16("70000", 1, 65535), None);
    }

    #[test]
    fn parse_u64_enforces_range() {
        assert_eq!(parse_u64("500", 10, 60_000), Some(500));
        assert_eq!(parse_u64("5", 10, 60_000), None);
        assert_eq!(parse_u64("99999999", 10, 60_000), None);
        assert_eq!(parse_u64("abc", 10, 60_000), None);
    }

    #[test]
    fn settings_path_is_under_geofeed_dir() {
        let path = settings_path();
        assert!(path.to_string_lossy().contains(".geofeed"));
        assert!(path.to_string_lossy().ends_with("settings.json"));
    }
}
