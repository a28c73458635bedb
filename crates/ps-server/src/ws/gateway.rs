//! WebSocket gateway for the scroll relay.
//!
//! Decodes JSON event frames and routes them: `join-room` mutates the
//! registry, `scroll-sync` fans out through the room broadcaster. Anything
//! else is dropped without a reply.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use ps_protocol::{ClientEvent, ScrollSync, MAX_MESSAGE_SIZE};

use super::broadcast;
use super::registry::{ConnectionId, ConnectionRegistry};
use crate::AppState;

/// Relay WebSocket upgrade.
pub async fn relay_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.max_message_size(MAX_MESSAGE_SIZE)
        .on_upgrade(move |socket| handle_relay_socket(socket, state))
}

async fn handle_relay_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    // Create an mpsc channel so other connections' tasks can push to us
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
    let connection_id = state.registry.register(tx.clone());

    // Forward channel → WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if ws_sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    // Receive loop
    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                handle_text(&state.registry, &connection_id, text.as_str());
            }
            Ok(Message::Ping(data)) => {
                let _ = tx.send(Message::Pong(data));
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {
                tracing::debug!(%connection_id, "Non-text frame ignored");
            }
            Err(e) => {
                tracing::debug!(%connection_id, "WebSocket read error: {}", e);
                break;
            }
        }
    }

    // Cleanup
    send_task.abort();
    let left = state.registry.on_disconnect(&connection_id);
    tracing::info!(%connection_id, rooms = ?left, "Relay WebSocket disconnected");
}

/// Decode one text frame and dispatch it. Malformed frames are dropped.
pub fn handle_text(registry: &ConnectionRegistry, connection_id: &ConnectionId, text: &str) {
    match ClientEvent::decode(text) {
        Ok(event) => dispatch(registry, connection_id, event),
        Err(e) => {
            tracing::debug!(%connection_id, "Ignoring unrecognized frame: {}", e);
        }
    }
}

pub fn dispatch(registry: &ConnectionRegistry, connection_id: &ConnectionId, event: ClientEvent) {
    match event {
        ClientEvent::JoinRoom(room_id) => registry.join(connection_id, &room_id),
        ClientEvent::ScrollSync(ScrollSync {
            room_id,
            scroll_top,
        }) => {
            broadcast::broadcast_scroll(registry, connection_id, &room_id, scroll_top);
        }
    }
}
