//! # geofeed-core
//!
//! Foundation types and the event fan-out primitive for geofeed.
//!
//! - [`GeoEvent`] — the immutable coordinate pair produced per resolved
//!   log line
//! - [`EventBus`] — single-producer, multi-consumer broadcast with
//!   best-effort (lossy, non-blocking) delivery
//! - [`Subscriber`] / [`SubscriberHandle`] — one client's rendezvous
//!   delivery channel and its registration token
//! - [`logging::init_subscriber`] — tracing subscriber setup

#![deny(unsafe_code)]

pub mod bus;
pub mod events;
pub mod logging;

pub use bus::{EventBus, Subscriber, SubscriberHandle};
pub use events::GeoEvent;
