//! In-memory registry for live relay connections and the rooms they joined.
//!
//! Rooms have no representation beyond their member set: a room appears on
//! the first join and its key is dropped when the last member disconnects.

use std::collections::HashSet;

use axum::extract::ws::Message;
use dashmap::DashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Channel sender capable of pushing WS frames to a connected peer.
pub type WsSender = mpsc::UnboundedSender<Message>;

pub type ConnectionId = Uuid;

/// Outbound handle and room memberships of one connected client.
#[derive(Debug)]
struct LiveConnection {
    tx: WsSender,
    rooms: HashSet<String>,
}

/// Central registry shared across all WebSocket handler tasks.
///
/// Lock order is always `connections` before `rooms`; no method holds a
/// `rooms` guard while touching `connections`.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    /// connection_id → sender + joined rooms
    connections: DashMap<ConnectionId, LiveConnection>,
    /// room_id → member connection ids
    rooms: DashMap<String, HashSet<ConnectionId>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            rooms: DashMap::new(),
        }
    }

    // ─── Connection lifecycle ────────────────────────────────

    /// Register a newly-connected client and assign its id.
    pub fn register(&self, tx: WsSender) -> ConnectionId {
        let connection_id = Uuid::new_v4();
        self.connections.insert(
            connection_id,
            LiveConnection {
                tx,
                rooms: HashSet::new(),
            },
        );
        tracing::info!(%connection_id, "Connection registered");
        connection_id
    }

    /// Remove a connection from every room it joined (on disconnect).
    /// Rooms left without members are dropped. Returns the rooms it left.
    pub fn on_disconnect(&self, connection_id: &ConnectionId) -> Vec<String> {
        let Some((_, conn)) = self.connections.remove(connection_id) else {
            return Vec::new();
        };

        for room_id in &conn.rooms {
            if let Some(mut members) = self.rooms.get_mut(room_id) {
                members.remove(connection_id);
            }
            // Guard above must be released before this; same shard.
            if self
                .rooms
                .remove_if(room_id, |_, members| members.is_empty())
                .is_some()
            {
                tracing::debug!(room_id, "Room emptied");
            }
        }

        tracing::info!(%connection_id, rooms = conn.rooms.len(), "Connection unregistered");
        conn.rooms.into_iter().collect()
    }

    // ─── Membership ──────────────────────────────────────────

    /// Add a connection to a room. Joining twice has no further effect.
    /// Unknown connections are ignored: they have nowhere to receive.
    pub fn join(&self, connection_id: &ConnectionId, room_id: &str) {
        let Some(mut conn) = self.connections.get_mut(connection_id) else {
            tracing::debug!(%connection_id, room_id, "Join from unregistered connection ignored");
            return;
        };
        if !conn.rooms.insert(room_id.to_string()) {
            return;
        }
        self.rooms
            .entry(room_id.to_string())
            .or_default()
            .insert(*connection_id);
        tracing::info!(%connection_id, room_id, "Connection joined room");
    }

    /// Snapshot of the connections currently in a room.
    pub fn members_of(&self, room_id: &str) -> HashSet<ConnectionId> {
        self.rooms
            .get(room_id)
            .map(|members| members.clone())
            .unwrap_or_default()
    }

    // ─── Delivery ────────────────────────────────────────────

    /// Queue a frame for a connection. Returns `false` if the connection is
    /// gone or its socket task has already shut down.
    pub fn send_to(&self, connection_id: &ConnectionId, msg: Message) -> bool {
        match self.connections.get(connection_id) {
            Some(conn) => conn.tx.send(msg).is_ok(),
            None => false,
        }
    }

    // ─── Stats ───────────────────────────────────────────────

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
