//! Room → document lookup.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use ps_common::{AppError, AppResult};

use super::FileUrlResponse;
use crate::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/room-file/{room_id}", get(get_room_file))
        .with_state(state)
}

async fn get_room_file(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> AppResult<Json<FileUrlResponse>> {
    match state.rooms.get(&room_id).await? {
        Some(file_url) => Ok(Json(FileUrlResponse { file_url })),
        None => Err(AppError::NotFound(
            "File not found for this room ID".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::api::{self, test_support};

    #[tokio::test]
    async fn test_unknown_room_is_404() {
        let (state, root) = test_support::local_state().await;
        let app = api::router(state);

        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/room-file/missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value =
            serde_json::from_slice(&to_bytes(resp.into_body(), usize::MAX).await.unwrap())
                .unwrap();
        assert_eq!(body["error"]["code"], 404);
        assert_eq!(body["error"]["message"], "File not found for this room ID");

        let _ = tokio::fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn test_known_room_returns_url() {
        let (state, root) = test_support::local_state().await;
        state
            .rooms
            .set("abc", "http://localhost:5000/uploads/1-a.pdf")
            .await
            .unwrap();
        let app = api::router(state);

        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/room-file/abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value =
            serde_json::from_slice(&to_bytes(resp.into_body(), usize::MAX).await.unwrap())
                .unwrap();
        assert_eq!(body["fileUrl"], "http://localhost:5000/uploads/1-a.pdf");

        let _ = tokio::fs::remove_dir_all(&root).await;
    }
}
