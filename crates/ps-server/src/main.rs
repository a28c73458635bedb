//! # PageSync Server
//!
//! WebSocket relay that keeps scroll positions in sync between everyone
//! viewing the same document in a room, plus the HTTP routes that upload a
//! document and look up which one a room is showing.

mod api;
mod services;
mod ws;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

/// Shared application state available to all handlers.
pub struct AppState {
    pub config: ps_common::AppConfig,
    /// Live relay connections and room membership.
    pub registry: ws::registry::ConnectionRegistry,
    /// Uploaded documents.
    pub blobs: services::blob_store::BlobStore,
    /// Which document each room shows. Never read by the relay.
    pub rooms: services::room_files::RoomFileStore,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Load configuration
    let config = ps_common::AppConfig::load()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .json()
        .init();

    tracing::info!("Starting PageSync server...");

    let blobs = services::blob_store::BlobStore::from_config(&config).await?;
    tracing::info!(backend = ?config.storage.backend, "Document storage ready");

    let rooms = services::room_files::RoomFileStore::from_config(&config).await?;
    tracing::info!(backend = ?config.rooms.backend, "Room file store ready");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        registry: ws::registry::ConnectionRegistry::new(),
        blobs,
        rooms,
    });

    // Build router
    let app = Router::new()
        .merge(api::router(state.clone()))
        .merge(ws::router(state.clone()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    // Start server
    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install CTRL+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
