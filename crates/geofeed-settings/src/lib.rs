//! # geofeed-settings
//!
//! Layered configuration for the geofeed server.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults** — [`GeofeedSettings::default()`]
//! 2. **User file** — `~/.geofeed/settings.json` (deep-merged over defaults)
//! 3. **Environment variables** — `GEOFEED_*` overrides (highest priority)
//!
//! CLI flags, applied by the binary, sit on top of all three.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;
