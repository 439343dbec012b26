//! Best-effort event fan-out to connected viewers.
//!
//! One [`EventBus`] carries events from the ingest pipeline to every
//! connected client session. Delivery is a rendezvous: an event reaches a
//! subscriber only if that subscriber's writer loop is already parked in
//! [`Subscriber::recv`] at the instant of the publish attempt. A subscriber
//! that is busy writing, or simply not scheduled, misses the event
//! permanently — there is no buffering, no replay, and the publisher never
//! waits. The trade favors freshness and a non-blocking publisher over
//! completeness.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::Notify;
use tracing::debug;

use crate::events::GeoEvent;

/// One subscriber's delivery channel: a zero-capacity rendezvous slot.
struct Slot {
    /// Value in flight between a successful handoff and the receiver
    /// waking to take it.
    value: Mutex<Option<GeoEvent>>,
    /// Set by the receiver immediately before parking, consumed by the
    /// publisher on a successful handoff.
    waiting: AtomicBool,
    /// End-of-stream marker.
    closed: AtomicBool,
    /// Wakes the parked receiver after a handoff or close.
    notify: Notify,
    /// Events skipped because the receiver was not parked.
    dropped: AtomicU64,
}

impl Slot {
    fn new() -> Self {
        Self {
            value: Mutex::new(None),
            waiting: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            notify: Notify::new(),
            dropped: AtomicU64::new(0),
        }
    }

    /// Attempt a non-blocking handoff. Succeeds only when the receiver is
    /// already parked; never waits.
    fn try_send(&self, event: GeoEvent) -> bool {
        if self.closed.load(Ordering::Acquire) {
            return false;
        }
        if !self.waiting.swap(false, Ordering::AcqRel) {
            return false;
        }
        *self.value.lock() = Some(event);
        self.notify.notify_one();
        true
    }

    fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.notify.notify_one();
    }
}

/// The receiving half of a subscriber's delivery channel.
///
/// Owned by exactly one client session; `recv` takes `&mut self` so the
/// queue has a single reader by construction.
pub struct Subscriber {
    slot: Arc<Slot>,
}

impl Subscriber {
    /// Create a fresh, unregistered subscriber.
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Slot::new()),
        }
    }

    /// The registration token for this subscriber.
    pub fn handle(&self) -> SubscriberHandle {
        SubscriberHandle {
            slot: Arc::clone(&self.slot),
        }
    }

    /// Receive the next event, parking until one is handed off.
    ///
    /// Returns `None` once the channel is closed. Only an event published
    /// while this call is parked can be delivered.
    pub async fn recv(&mut self) -> Option<GeoEvent> {
        loop {
            if let Some(event) = self.slot.value.lock().take() {
                return Some(event);
            }
            if self.slot.closed.load(Ordering::Acquire) {
                return None;
            }
            // The notified future is created before the waiting flag is
            // published, so a handoff that lands between the store and the
            // await leaves a stored permit and cannot be missed.
            let notified = self.slot.notify.notified();
            self.slot.waiting.store(true, Ordering::Release);
            notified.await;
        }
    }

    /// Events that were published while this subscriber was not parked.
    pub fn drop_count(&self) -> u64 {
        self.slot.dropped.load(Ordering::Relaxed)
    }
}

impl Default for Subscriber {
    fn default() -> Self {
        Self::new()
    }
}

/// Registration token addressing one subscriber's delivery channel.
///
/// Cheap to clone; all clones refer to the same channel.
#[derive(Clone)]
pub struct SubscriberHandle {
    slot: Arc<Slot>,
}

impl SubscriberHandle {
    /// Close the channel, ending the owning session's receive loop.
    pub fn close(&self) {
        self.slot.close();
    }
}

/// Fan-out registry: broadcasts each published event to every registered
/// subscriber without letting any slow subscriber stall the publisher.
///
/// Construct one bus explicitly and share it (`Arc`) between the pipeline
/// and the connection handlers; there is no process-wide singleton.
pub struct EventBus {
    registry: Mutex<Vec<Arc<Slot>>>,
}

impl EventBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self {
            registry: Mutex::new(Vec::new()),
        }
    }

    /// Register a subscriber.
    ///
    /// Registering the same subscriber twice is a caller error and is not
    /// checked.
    pub fn subscribe(&self, handle: &SubscriberHandle) {
        self.registry.lock().push(Arc::clone(&handle.slot));
    }

    /// Remove a subscriber. A no-op if the handle was never registered or
    /// was already removed; safe to call concurrently with `publish`.
    pub fn unsubscribe(&self, handle: &SubscriberHandle) {
        self.registry
            .lock()
            .retain(|slot| !Arc::ptr_eq(slot, &handle.slot));
    }

    /// Broadcast an event to every registered subscriber.
    ///
    /// Each delivery is a non-blocking rendezvous attempt: subscribers not
    /// parked in [`Subscriber::recv`] at this instant miss the event. Misses
    /// are counted and logged, never retried. Subscribers that do receive
    /// see events in publish order, since attempts are serialized under the
    /// registry lock.
    pub fn publish(&self, event: GeoEvent) {
        let registry = self.registry.lock();
        for slot in registry.iter() {
            if !slot.try_send(event) {
                let dropped = slot.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                debug!(dropped, "subscriber not ready, event dropped");
            }
        }
    }

    /// Close every registered subscriber's channel, signaling end-of-stream
    /// to each session. Used only at process shutdown; publishing afterward
    /// remains a safe no-op.
    pub fn close_all(&self) {
        let registry = self.registry.lock();
        for slot in registry.iter() {
            slot.close();
        }
    }

    /// Number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.registry.lock().len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
