//! Feedback repository: append-only ratings with aggregate statistics.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{RunQueryDsl, SimpleAsyncConnection};
use serde::{Deserialize, Serialize};

use super::models::{FeedbackRecord, NewFeedback};
use super::parse_datetime;
use super::pool::{DieselError, SqlitePool};
use super::util::round2;
use crate::schema::feedback;

/// Ratings at or above this count as positive.
pub const POSITIVE_RATING_THRESHOLD: i32 = 4;

/// Feedback submitted by a user about one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFeedbackEntry {
    pub user_message: String,
    pub advisor_response: String,
    pub rating: i32,
    #[serde(default)]
    pub comment: Option<String>,
}

/// A stored feedback row.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackEntry {
    pub id: i32,
    pub user_message: String,
    pub advisor_response: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl From<FeedbackRecord> for FeedbackEntry {
    fn from(record: FeedbackRecord) -> Self {
        FeedbackEntry {
            id: record.id,
            user_message: record.user_message,
            advisor_response: record.advisor_response,
            rating: record.rating,
            comment: record.comment,
            timestamp: parse_datetime(&record.timestamp),
        }
    }
}

/// Aggregate over all feedback rows, as served by `/stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackStats {
    pub total_feedback: i64,
    pub average_rating: f64,
    pub positive_feedback: i64,
    pub satisfaction_rate: f64,
}

impl FeedbackStats {
    fn from_counts(total: i64, average: Option<f64>, positive: i64) -> Self {
        let satisfaction_rate = if total == 0 {
            0.0
        } else {
            positive as f64 / total as f64 * 100.0
        };
        Self {
            total_feedback: total,
            average_rating: round2(average.unwrap_or(0.0)),
            positive_feedback: positive,
            satisfaction_rate: round2(satisfaction_rate),
        }
    }
}

#[derive(QueryableByName)]
struct FeedbackAggregate {
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    total: i64,
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Double>)]
    average: Option<f64>,
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    positive: i64,
}

#[derive(QueryableByName)]
struct LastInsertId {
    #[diesel(sql_type = diesel::sql_types::Integer)]
    id: i32,
}

#[derive(Clone, Debug)]
pub struct FeedbackRepository {
    pool: SqlitePool,
}

impl FeedbackRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append a feedback row and return its id.
    pub async fn insert(&self, entry: &NewFeedbackEntry) -> Result<i32, DieselError> {
        let mut conn = self.pool.get().await?;
        let now = Utc::now().to_rfc3339();

        let row = NewFeedback {
            user_message: &entry.user_message,
            advisor_response: &entry.advisor_response,
            rating: entry.rating,
            comment: entry.comment.as_deref(),
            timestamp: &now,
        };

        diesel::insert_into(feedback::table)
            .values(&row)
            .execute(&mut conn)
            .await?;

        // Same connection, so this is the row just written
        let last: LastInsertId = diesel::sql_query("SELECT last_insert_rowid() AS id")
            .get_result(&mut conn)
            .await?;

        Ok(last.id)
    }

    /// Count, average rating, and positive share across all rows.
    pub async fn aggregate(&self) -> Result<FeedbackStats, DieselError> {
        let mut conn = self.pool.get().await?;

        let row: FeedbackAggregate = diesel::sql_query(
            r#"SELECT
                COUNT(*) AS total,
                AVG(rating) AS average,
                COALESCE(SUM(CASE WHEN rating >= ? THEN 1 ELSE 0 END), 0) AS positive
            FROM feedback"#,
        )
        .bind::<diesel::sql_types::Integer, _>(POSITIVE_RATING_THRESHOLD)
        .get_result(&mut conn)
        .await?;

        Ok(FeedbackStats::from_counts(row.total, row.average, row.positive))
    }

    /// Most recent rows first.
    pub async fn recent(&self, limit: i64) -> Result<Vec<FeedbackEntry>, DieselError> {
        let mut conn = self.pool.get().await?;

        feedback::table
            .order(feedback::id.desc())
            .limit(limit)
            .select(FeedbackRecord::as_select())
            .load::<FeedbackRecord>(&mut conn)
            .await
            .map(|records| records.into_iter().map(FeedbackEntry::from).collect())
    }

    /// Check that the database answers a trivial query.
    pub async fn ping(&self) -> Result<(), DieselError> {
        let mut conn = self.pool.get().await?;
        conn.batch_execute("SELECT 1").await
    }
}
