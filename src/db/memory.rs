use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{CourseView, NewUser, User};

use super::{UserStore, ViewStore};

/// Account storage held in process memory.
///
/// Backs integration tests and database-free local runs; mirrors the
/// Postgres store's semantics, including the duplicate-email conflict.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<Vec<User>>,
}

#[async_trait::async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let mut users = self.users.lock().await;
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(AppError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }

        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email,
            name: new_user.name,
            password_hash: new_user.password_hash,
            created_at: Utc::now(),
        };
        users.push(user.clone());

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.lock().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let users = self.users.lock().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }
}

/// View log held in process memory, keyed by (user, course) so repeat
/// views collapse into a single refreshed entry.
#[derive(Default)]
pub struct InMemoryViewStore {
    views: Mutex<HashMap<(Uuid, String), DateTime<Utc>>>,
}

#[async_trait::async_trait]
impl ViewStore for InMemoryViewStore {
    async fn record_view(&self, user_id: Uuid, course_id: &str) -> AppResult<()> {
        let mut views = self.views.lock().await;
        views.insert((user_id, course_id.to_string()), Utc::now());
        Ok(())
    }

    async fn recent_views(&self, user_id: Uuid, limit: i64) -> AppResult<Vec<CourseView>> {
        let views = self.views.lock().await;
        let mut rows: Vec<CourseView> = views
            .iter()
            .filter(|((uid, _), _)| *uid == user_id)
            .map(|((uid, cid), viewed_at)| CourseView {
                user_id: *uid,
                course_id: cid.clone(),
                viewed_at: *viewed_at,
            })
            .collect();

        rows.sort_by(|a, b| b.viewed_at.cmp(&a.viewed_at));
        rows.truncate(limit.max(0) as usize);

        Ok(rows)
    }
}
