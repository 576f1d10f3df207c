//! Feedback submission and statistics handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::{info, warn};

use super::super::error::ApiError;
use super::super::AppState;
use crate::repository::{FeedbackStats, NewFeedbackEntry};

/// Ratings the frontend offers. Others are stored as given.
const EXPECTED_RATINGS: std::ops::RangeInclusive<i32> = 1..=5;

#[derive(Debug, Serialize)]
pub struct FeedbackAccepted {
    pub status: &'static str,
    pub message: &'static str,
    pub id: i32,
}

pub async fn submit_feedback(
    State(state): State<AppState>,
    payload: Result<Json<NewFeedbackEntry>, JsonRejection>,
) -> Result<Json<FeedbackAccepted>, ApiError> {
    let Json(entry) = payload?;

    if !EXPECTED_RATINGS.contains(&entry.rating) {
        warn!(rating = entry.rating, "feedback rating outside 1-5, storing as given");
    }

    let id = state.feedback_repo.insert(&entry).await?;
    info!(id, rating = entry.rating, "feedback recorded");

    Ok(Json(FeedbackAccepted {
        status: "success",
        message: "Thank you for your feedback!",
        id,
    }))
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<FeedbackStats>, ApiError> {
    Ok(Json(state.feedback_repo.aggregate().await?))
}
