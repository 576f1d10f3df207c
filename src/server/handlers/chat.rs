//! Chat and structured-advice handlers.

use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::super::client_ip::ClientId;
use super::super::error::ApiError;
use super::super::AppState;
use crate::advice::{self, StructuredAdvice};

/// Request body for `/chat` and `/ask`.
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    #[serde(default)]
    pub message: String,
}

impl MessageRequest {
    /// The trimmed message, or a validation error when there's nothing to send.
    fn text(&self) -> Result<&str, ApiError> {
        let text = self.message.trim();
        if text.is_empty() {
            return Err(ApiError::Validation("Message cannot be empty".to_string()));
        }
        Ok(text)
    }
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
}

/// Plain pass-through to the model.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<MessageRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, ApiError> {
    let Json(request) = payload?;
    let message = request.text()?;

    let reply = state.llm.complete(None, message).await?;
    Ok(Json(ChatReply { reply }))
}

/// Rate-limited structured advice.
///
/// An empty message is rejected before the limiter is consulted, so it neither
/// consumes a slot nor reaches the model.
pub async fn ask(
    State(state): State<AppState>,
    ClientId(client): ClientId,
    payload: Result<Json<MessageRequest>, JsonRejection>,
) -> Result<Json<StructuredAdvice>, ApiError> {
    let Json(request) = payload?;
    let message = request.text()?;

    let decision = state.rate_limiter.check(&client, Instant::now()).await;
    if !decision.allowed {
        return Err(ApiError::RateLimited {
            retry_after: decision
                .retry_after
                .unwrap_or_else(|| state.rate_limiter.config().window()),
        });
    }

    let raw = state
        .llm
        .complete(Some(state.advice_prompt.as_ref()), message)
        .await?;

    let outcome = advice::classify(&raw);
    if outcome.is_structured() {
        debug!(client = %client, "structured advice returned");
    } else {
        warn!(
            client = %client,
            reply_len = raw.len(),
            "model reply was not structured advice, using fallback"
        );
    }
    Ok(Json(outcome.into_advice()))
}
