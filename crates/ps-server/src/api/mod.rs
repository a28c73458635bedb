//! HTTP routes for document upload and room → file lookup.

mod health;
mod room_files;
mod upload;

use std::sync::Arc;

use axum::Router;
use serde::Serialize;
use tower_http::services::ServeDir;

use crate::AppState;

/// Build the HTTP router with all sub-routes.
pub fn router(state: Arc<AppState>) -> Router {
    let router = Router::new()
        .merge(upload::router(state.clone()))
        .merge(room_files::router(state.clone()))
        .merge(health::router(state.clone()));

    // Local uploads are served straight from disk; S3 URLs point at the bucket.
    match state.blobs.local_dir() {
        Some(dir) => router.nest_service("/uploads", ServeDir::new(dir)),
        None => router,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileUrlResponse {
    file_url: String,
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::PathBuf;
    use std::sync::Arc;

    use crate::services::blob_store::{BlobStore, LocalBlobStore};
    use crate::services::room_files::{JsonRoomFileStore, RoomFileStore};
    use crate::ws::registry::ConnectionRegistry;
    use crate::AppState;

    /// App state backed by a throwaway directory. Returns the directory so
    /// tests can clean it up.
    pub async fn local_state() -> (Arc<AppState>, PathBuf) {
        let root = std::env::temp_dir().join(format!("ps-api-{}", uuid::Uuid::new_v4()));
        let config = ps_common::AppConfig::default();
        let blobs = BlobStore::Local(
            LocalBlobStore::new(root.join("uploads"), &config.server.public_base_url)
                .await
                .unwrap(),
        );
        let rooms = RoomFileStore::Json(
            JsonRoomFileStore::load(root.join("roomMap.json"))
                .await
                .unwrap(),
        );
        let state = Arc::new(AppState {
            config,
            registry: ConnectionRegistry::new(),
            blobs,
            rooms,
        });
        (state, root)
    }
}
