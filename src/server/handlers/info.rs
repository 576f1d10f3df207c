//! Informational document endpoints and `/api/info`.

use std::path::Path;

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use tracing::warn;

use super::super::AppState;

/// Static JSON documents served from the docs directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoDocument {
    Roadmap,
    UserStories,
    Architecture,
    Legal,
}

impl InfoDocument {
    pub const ALL: [InfoDocument; 4] = [
        InfoDocument::Roadmap,
        InfoDocument::UserStories,
        InfoDocument::Architecture,
        InfoDocument::Legal,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            InfoDocument::Roadmap => "roadmap.json",
            InfoDocument::UserStories => "user_stories.json",
            InfoDocument::Architecture => "architecture.json",
            InfoDocument::Legal => "legal.json",
        }
    }
}

/// Read and parse a document. A missing or invalid file becomes `{"error": ...}`.
pub async fn load_document(docs_dir: &Path, doc: InfoDocument) -> Value {
    let name = doc.file_name();
    let contents = match tokio::fs::read_to_string(docs_dir.join(name)).await {
        Ok(c) => c,
        Err(e) => {
            warn!("Could not read {}: {}", name, e);
            return json!({ "error": format!("{} not found", name) });
        }
    };

    match serde_json::from_str(&contents) {
        Ok(value) => value,
        Err(e) => {
            warn!("Invalid JSON in {}: {}", name, e);
            json!({ "error": format!("{} contains invalid JSON", name) })
        }
    }
}

pub async fn roadmap(State(state): State<AppState>) -> Json<Value> {
    Json(load_document(&state.docs_dir, InfoDocument::Roadmap).await)
}

pub async fn user_stories(State(state): State<AppState>) -> Json<Value> {
    Json(load_document(&state.docs_dir, InfoDocument::UserStories).await)
}

pub async fn architecture(State(state): State<AppState>) -> Json<Value> {
    Json(load_document(&state.docs_dir, InfoDocument::Architecture).await)
}

pub async fn legal(State(state): State<AppState>) -> Json<Value> {
    Json(load_document(&state.docs_dir, InfoDocument::Legal).await)
}

/// Service metadata: endpoints, model, and rate limits.
pub async fn api_info(State(state): State<AppState>) -> Json<Value> {
    let limits = state.rate_limiter.config();
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "description": env!("CARGO_PKG_DESCRIPTION"),
        "model": state.llm.model(),
        "endpoints": [
            { "method": "GET", "path": "/", "description": "Frontend page" },
            { "method": "POST", "path": "/chat", "description": "Free-form reply from the model" },
            { "method": "POST", "path": "/ask", "description": "Structured advice (rate limited)" },
            { "method": "POST", "path": "/feedback", "description": "Rate an answer" },
            { "method": "GET", "path": "/stats", "description": "Feedback statistics" },
            { "method": "GET", "path": "/roadmap", "description": "Product roadmap" },
            { "method": "GET", "path": "/user-stories", "description": "User stories" },
            { "method": "GET", "path": "/architecture", "description": "Architecture overview" },
            { "method": "GET", "path": "/legal", "description": "Legal notices" },
            { "method": "GET", "path": "/health", "description": "Health check" },
            { "method": "GET", "path": "/api/info", "description": "This document" },
        ],
        "rate_limits": {
            "/ask": {
                "max_requests": limits.max_requests,
                "window_seconds": limits.window_secs,
            }
        }
    }))
}
