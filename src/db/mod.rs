pub mod memory;
pub mod postgres;

use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{CourseView, NewUser, User};

pub use postgres::create_pool;

/// Maximum number of view events fed into the recommendation engine.
pub const RECENT_VIEW_LIMIT: i64 = 10;

/// Account storage
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    /// Creates an account. Fails with a conflict when the email is taken.
    async fn create(&self, new_user: NewUser) -> AppResult<User>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;
}

/// Append-and-query log of course views.
///
/// `record_view` is an atomic upsert keyed by (user, course): concurrent
/// or repeated views of the same course collapse into one row with a
/// refreshed `viewed_at`.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ViewStore: Send + Sync {
    async fn record_view(&self, user_id: Uuid, course_id: &str) -> AppResult<()>;

    /// Most recent views first, at most `limit` entries.
    async fn recent_views(&self, user_id: Uuid, limit: i64) -> AppResult<Vec<CourseView>>;
}
