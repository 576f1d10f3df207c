//! Router configuration for the web server.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let assets = ServeDir::new(&state.static_dir);

    Router::new()
        // Frontend
        .route("/", get(handlers::index))
        .nest_service("/static", assets)
        // Model endpoints
        .route("/chat", post(handlers::chat))
        .route("/ask", post(handlers::ask))
        // Feedback
        .route("/feedback", post(handlers::submit_feedback))
        .route("/stats", get(handlers::stats))
        // Informational documents
        .route("/roadmap", get(handlers::roadmap))
        .route("/user-stories", get(handlers::user_stories))
        .route("/architecture", get(handlers::architecture))
        .route("/legal", get(handlers::legal))
        // Service status
        .route("/health", get(handlers::health))
        .route("/api/info", get(handlers::api_info))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
