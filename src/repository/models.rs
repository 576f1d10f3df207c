//! Diesel models for database tables.

use diesel::prelude::*;

use crate::schema;

/// Feedback record from the database.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::feedback)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FeedbackRecord {
    pub id: i32,
    pub user_message: String,
    pub advisor_response: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub timestamp: String,
}

/// New feedback row for insertion.
#[derive(Insertable, Debug)]
#[diesel(table_name = schema::feedback)]
pub struct NewFeedback<'a> {
    pub user_message: &'a str,
    pub advisor_response: &'a str,
    pub rating: i32,
    pub comment: Option<&'a str>,
    pub timestamp: &'a str,
}
