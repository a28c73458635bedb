//! Document upload.
//!
//! Accepts a multipart form with a `file` part and a `roomId` field, stores
//! the file and points the room at it.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};

use ps_common::{AppError, AppResult};

use super::FileUrlResponse;
use crate::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    let limit = upload_limit_bytes(state.config.server.max_upload_mb);
    Router::new()
        .route("/upload", post(upload_document))
        .layer(DefaultBodyLimit::max(limit))
        .with_state(state)
}

/// Configured MiB as bytes, clamped instead of overflowing.
fn upload_limit_bytes(max_upload_mb: usize) -> usize {
    max_upload_mb.saturating_mul(1024 * 1024)
}

struct UploadedFile {
    name: String,
    content_type: Option<String>,
    data: Bytes,
}

async fn upload_document(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> AppResult<Json<FileUrlResponse>> {
    let mut room_id: Option<String> = None;
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "roomId" => {
                room_id = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?,
                );
            }
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file = Some(UploadedFile {
                    name: file_name,
                    content_type,
                    data,
                });
            }
            other => {
                tracing::debug!(field = other, "Ignoring unexpected upload field");
            }
        }
    }

    let room_id = room_id.ok_or_else(|| AppError::BadRequest("missing roomId".into()))?;
    let file = file.ok_or_else(|| AppError::BadRequest("missing file".into()))?;

    let blob = state
        .blobs
        .put(&file.name, file.content_type.as_deref(), file.data)
        .await?;
    state.rooms.set(&room_id, &blob.url).await?;

    tracing::info!(%room_id, key = %blob.key, "Document uploaded for room");
    Ok(Json(FileUrlResponse { file_url: blob.url }))
}
