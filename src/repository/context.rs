//! Database context for connection setup and repository access.
//!
//! Create one context per command or service, then use it to hand out
//! repositories.
//!
//! # Example
//! ```ignore
//! let ctx = DbContext::new(&db_path);
//! ctx.init_schema().await?;
//! let stats = ctx.feedback().aggregate().await?;
//! ```

use std::path::Path;

use diesel_async::SimpleAsyncConnection;

use super::feedback::FeedbackRepository;
use super::pool::{DieselError, SqlitePool};

#[derive(Clone, Debug)]
pub struct DbContext {
    pool: SqlitePool,
}

impl DbContext {
    /// Create a new database context from a file path.
    pub fn new(db_path: &Path) -> Self {
        Self {
            pool: SqlitePool::from_path(db_path),
        }
    }

    /// Create a new database context from a URL like `sqlite:path/to/db.sqlite`
    /// or a bare file path.
    pub fn from_url(database_url: &str) -> Self {
        Self {
            pool: SqlitePool::new(database_url),
        }
    }

    /// Get a feedback repository.
    pub fn feedback(&self) -> FeedbackRepository {
        FeedbackRepository::new(self.pool.clone())
    }

    /// Initialize the database schema.
    ///
    /// Idempotent: creates tables and indexes only if they don't exist.
    pub async fn init_schema(&self) -> Result<(), DieselError> {
        let mut conn = self.pool.get().await?;
        conn.batch_execute(
            r#"
            -- Feedback table (append-only)
            CREATE TABLE IF NOT EXISTS feedback (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_message TEXT NOT NULL,
                advisor_response TEXT NOT NULL,
                rating INTEGER NOT NULL,
                comment TEXT,
                timestamp TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_feedback_timestamp ON feedback(timestamp);
            "#,
        )
        .await
    }
}
