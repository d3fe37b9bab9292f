pub mod password;
pub mod rate_limit;
pub mod session;

pub use password::{hash_password, verify_password};
pub use rate_limit::RateLimiter;
pub use session::{SessionClaims, SessionKeys};

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

/// The authenticated caller, resolved from the `Authorization` bearer token
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::AuthRequired)?;

        let token = value.strip_prefix("Bearer ").ok_or(AppError::AuthRequired)?;
        let claims = state.sessions.verify(token)?;

        Ok(CurrentUser {
            id: claims.sub,
            email: claims.email,
        })
    }
}
