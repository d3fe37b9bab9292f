use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A registered account
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    /// Argon2 hash; never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Input for account creation, password already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

/// One course-view event.
///
/// At most one row exists per (user, course); a repeat view refreshes
/// `viewed_at` instead of adding a second row.
#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct CourseView {
    pub user_id: Uuid,
    pub course_id: String,
    pub viewed_at: DateTime<Utc>,
}
