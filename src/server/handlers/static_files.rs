//! Frontend page handler.

use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};

use super::super::error::ApiError;
use super::super::AppState;

/// Frontend entry page inside the static directory.
pub const INDEX_FILE: &str = "index.html";

/// Serve `index.html` from the static directory.
pub async fn index(State(state): State<AppState>) -> Result<Response, ApiError> {
    let path = state.static_dir.join(INDEX_FILE);
    match tokio::fs::read_to_string(&path).await {
        Ok(content) => Ok(Html(content).into_response()),
        Err(e) => {
            tracing::warn!("Could not read {}: {}", path.display(), e);
            Err(ApiError::NotFound(format!("{} not found", INDEX_FILE)))
        }
    }
}
