use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::{RateLimiter, SessionKeys};
use crate::config::Config;
use crate::db::postgres::{PgUserStore, PgViewStore};
use crate::db::{UserStore, ViewStore};
use crate::services::{Catalog, Recommender, RemoteRecommender};

/// Shared application state, cheap to clone per request
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub views: Arc<dyn ViewStore>,
    pub catalog: Catalog,
    pub sessions: SessionKeys,
    pub signup_limiter: RateLimiter,
    /// Remote model backend, when configured
    pub remote: Option<Arc<dyn Recommender>>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        views: Arc<dyn ViewStore>,
        catalog: Catalog,
        sessions: SessionKeys,
    ) -> Self {
        Self {
            users,
            views,
            catalog,
            sessions,
            signup_limiter: RateLimiter::for_signup(),
            remote: None,
        }
    }

    /// Wires state from configuration and a database pool
    pub fn from_config(config: &Config, pool: PgPool) -> Self {
        let mut state = Self::new(
            Arc::new(PgUserStore::new(pool.clone())),
            Arc::new(PgViewStore::new(pool)),
            Catalog::new(config.catalog_path.as_str()),
            SessionKeys::new(&config.session_secret),
        );
        state.remote = config
            .model_backend_url
            .as_ref()
            .map(|url| Arc::new(RemoteRecommender::new(url.clone())) as Arc<dyn Recommender>);

        state
    }

    pub fn with_remote(mut self, remote: Arc<dyn Recommender>) -> Self {
        self.remote = Some(remote);
        self
    }
}
