//! WebSocket relay for room-scoped scroll synchronization.

pub mod broadcast;
mod gateway;
pub mod registry;

use crate::AppState;
use axum::Router;
use std::sync::Arc;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", axum::routing::get(gateway::relay_ws_handler))
        .with_state(state)
}
