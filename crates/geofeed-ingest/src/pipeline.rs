//! The line-to-event ingest pipeline.

use std::net::IpAddr;
use std::sync::Arc;

use geofeed_core::EventBus;
use geofeed_geoip::{GeoipError, LocationResolver};
use tracing::{debug, info, warn};

use crate::extract;
use crate::follow::LineSource;

/// Converts each raw log line into zero or one published event.
///
/// Per line: extract the first IPv4-shaped substring, parse it, resolve it
/// to coordinates, publish. Every per-line failure — no match, parse
/// failure, unknown address, lookup error — logs a diagnostic and discards
/// the line; nothing short of the line sequence ending stops the loop.
pub struct IngestPipeline<S> {
    source: S,
    resolver: Arc<dyn LocationResolver>,
    bus: Arc<EventBus>,
}

impl<S: LineSource> IngestPipeline<S> {
    /// Build a pipeline over a line source, a resolver, and the bus it
    /// publishes to.
    pub fn new(source: S, resolver: Arc<dyn LocationResolver>, bus: Arc<EventBus>) -> Self {
        Self {
            source,
            resolver,
            bus,
        }
    }

    /// Consume the line sequence until it ends.
    pub async fn run(mut self) {
        while let Some(line) = self.source.next_line().await {
            self.process_line(&line);
        }
        info!("ingest pipeline stopped");
    }

    fn process_line(&self, line: &str) {
        let Some(raw) = extract::find_ipv4(line) else {
            debug!(line, "no address found in line");
            return;
        };
        let address: IpAddr = match raw.parse() {
            Ok(address) => address,
            Err(e) => {
                debug!(raw, error = %e, "matched address does not parse");
                return;
            }
        };
        match self.resolver.resolve(address) {
            Ok(event) => self.bus.publish(event),
            Err(GeoipError::AddressNotFound(_)) => {
                debug!(%address, "address has no location, line discarded");
            }
            Err(e) => {
                warn!(%address, error = %e, "location lookup failed, line discarded");
            }
        }
    }
}
