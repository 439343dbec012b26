//! WebSocket upgrade and per-client session lifecycle.

pub mod session;

use std::net::SocketAddr;

use axum::extract::connect_info::ConnectInfo;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::State;
use axum::response::Response;
use tracing::info;
use uuid::Uuid;

use crate::server::AppState;

/// `GET /ws` — upgrade the request and hand the socket to a session.
///
/// If the upgrade handshake fails, axum responds with an error status and
/// no subscriber is ever created.
pub async fn ws_handler(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
) -> Response {
    let client_id = format!("conn_{}", Uuid::now_v7().simple());
    info!(client_id, peer = %peer, "new websocket connection");
    ws.on_upgrade(move |socket| session::run_session(socket, client_id, state.bus))
}
