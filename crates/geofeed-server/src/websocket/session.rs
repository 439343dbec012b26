//! WebSocket session lifecycle — bridges one connected client to the event
//! bus from upgrade through disconnect.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use geofeed_core::{EventBus, Subscriber};
use metrics::{counter, gauge};
use tracing::{debug, info, warn};

use crate::metrics::{
    WS_CONNECTIONS_ACTIVE, WS_CONNECTIONS_TOTAL, WS_DISCONNECTIONS_TOTAL, WS_EVENTS_SENT_TOTAL,
};

/// Run a session for one connected client.
///
/// The session registers a single subscriber for its whole lifetime and
/// runs two loops:
/// - a spawned *reader* whose only job is liveness: it drains incoming
///   frames (content irrelevant) and, on close or error, unsubscribes and
///   closes the subscriber's queue;
/// - an inline *writer* that parks on the queue and serializes each
///   delivered event to the socket, logging write errors without failing.
///
/// The writer also ends when the bus closes every queue at shutdown; both
/// paths tolerate the redundant unsubscribe.
pub async fn run_session(ws: WebSocket, client_id: String, bus: Arc<EventBus>) {
    counter!(WS_CONNECTIONS_TOTAL).increment(1);
    gauge!(WS_CONNECTIONS_ACTIVE).increment(1.0);

    let (mut ws_tx, mut ws_rx) = ws.split();
    let mut sub = Subscriber::new();
    let handle = sub.handle();
    bus.subscribe(&handle);

    let reader = tokio::spawn({
        let bus = Arc::clone(&bus);
        let handle = handle.clone();
        let client_id = client_id.clone();
        async move {
            loop {
                match ws_rx.next().await {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    // Whatever the client sends is irrelevant; this loop
                    // only exists to notice the disconnect.
                    Some(Ok(_)) => {}
                }
            }
            debug!(client_id, "client connection closed");
            bus.unsubscribe(&handle);
            handle.close();
        }
    });

    let mut sent: u64 = 0;
    while let Some(event) = sub.recv().await {
        let json = match serde_json::to_string(&event) {
            Ok(json) => json,
            Err(e) => {
                warn!(client_id, error = %e, "failed to serialize event");
                continue;
            }
        };
        if let Err(e) = ws_tx.send(Message::Text(json.into())).await {
            warn!(client_id, error = %e, "failed to write event to client");
            continue;
        }
        sent += 1;
        counter!(WS_EVENTS_SENT_TOTAL).increment(1);
    }

    // Queue closed — either the reader saw the disconnect or the bus shut
    // everything down. Unsubscribing again is a no-op.
    bus.unsubscribe(&handle);
    reader.abort();
    info!(client_id, sent, dropped = sub.drop_count(), "client disconnected");
    counter!(WS_DISCONNECTIONS_TOTAL).increment(1);
    gauge!(WS_CONNECTIONS_ACTIVE).decrement(1.0);
}

#[cfg(test)]
mod tests {
    // Full session behavior needs a real WebSocket connection and is
    // covered by tests/integration.rs. The unit tests here pin the wire
    // payload the writer produces.

    use geofeed_core::GeoEvent;

    #[test]
    fn writer_payload_is_two_field_json() {
        let json = serde_json::to_string(&GeoEvent::new(40.7, -74.0)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["latitude"], 40.7);
        assert_eq!(value["longitude"], -74.0);
        assert_eq!(value.as_object().unwrap().len(), 2);
    }
}
