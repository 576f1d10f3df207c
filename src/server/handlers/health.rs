//! Health check for container orchestration.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde_json::json;

use super::super::AppState;
use super::info::InfoDocument;
use super::static_files::INDEX_FILE;

/// Expected files that aren't on disk.
async fn missing_files(state: &AppState) -> Vec<&'static str> {
    let mut missing = Vec::new();
    for doc in InfoDocument::ALL {
        let path = state.docs_dir.join(doc.file_name());
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            missing.push(doc.file_name());
        }
    }
    if !tokio::fs::try_exists(state.static_dir.join(INDEX_FILE))
        .await
        .unwrap_or(false)
    {
        missing.push(INDEX_FILE);
    }
    missing
}

/// `healthy` when everything is in place, `degraded` when files are missing,
/// 503 `unhealthy` when the database doesn't answer.
pub async fn health(State(state): State<AppState>) -> Response {
    let missing = missing_files(&state).await;
    let timestamp = Utc::now().to_rfc3339();
    let api_version = env!("CARGO_PKG_VERSION");

    match state.feedback_repo.ping().await {
        Ok(()) => {
            let status = if missing.is_empty() {
                "healthy"
            } else {
                "degraded"
            };
            Json(json!({
                "status": status,
                "timestamp": timestamp,
                "database": "connected",
                "missing_files": missing,
                "api_version": api_version,
            }))
            .into_response()
        }
        Err(e) => {
            tracing::error!("Health check database failure: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "timestamp": timestamp,
                    "database": format!("error: {}", e),
                    "missing_files": missing,
                    "api_version": api_version,
                })),
            )
                .into_response()
        }
    }
}
