//! # geofeed-server
//!
//! Axum HTTP + `WebSocket` server fanning geolocation events out to
//! connected viewers.
//!
//! - HTTP endpoints: index map page, health check, Prometheus metrics
//! - `WebSocket` gateway: upgrade at `/ws`, one session per client with a
//!   liveness reader and an event writer
//! - Graceful shutdown via `CancellationToken`

#![deny(unsafe_code)]

pub mod config;
pub mod errors;
pub mod health;
pub mod index;
pub mod metrics;
pub mod server;
pub mod shutdown;
pub mod websocket;

pub use config::ServerConfig;
pub use errors::{Result, ServerError};
pub use server::{AppState, GeofeedServer};
pub use shutdown::ShutdownCoordinator;
