use std::sync::OnceLock;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{hash_password, verify_password, CurrentUser};
use crate::error::{AppError, AppResult};
use crate::models::{NewUser, User};
use crate::state::AppState;

/// Passwords rejected outright regardless of length
const WEAK_PASSWORDS: [&str; 5] = ["password", "123456", "12345678", "qwerty", "abc123"];

const MIN_PASSWORD_LEN: usize = 8;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub message: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
    })
}

/// Best-effort caller identity for rate limiting
fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(',').next().unwrap_or(v).trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

// Handlers

/// Registers a new account
pub async fn signup(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<SignupResponse>)> {
    if !state.signup_limiter.check(&client_key(&headers)) {
        return Err(AppError::RateLimited(
            "Too many signup attempts. Please try again later.".to_string(),
        ));
    }

    if request.email.is_empty() || request.password.is_empty() || request.name.is_empty() {
        return Err(AppError::InvalidInput(
            "Email, password, and name are required".to_string(),
        ));
    }

    if !email_regex().is_match(&request.email) {
        return Err(AppError::InvalidInput("Invalid email format".to_string()));
    }

    if request.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::InvalidInput(
            "Password must be at least 8 characters long".to_string(),
        ));
    }

    if WEAK_PASSWORDS.contains(&request.password.to_lowercase().as_str()) {
        return Err(AppError::InvalidInput(
            "Password is too weak. Please choose a stronger password.".to_string(),
        ));
    }

    let password_hash = hash_password(&request.password)?;
    let user = state
        .users
        .create(NewUser {
            email: request.email,
            name: request.name,
            password_hash,
        })
        .await?;

    tracing::info!(user_id = %user.id, "Account created");

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User created successfully".to_string(),
            user: UserResponse::from(&user),
        }),
    ))
}

/// Authenticates credentials and issues a session token
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let user = state
        .users
        .find_by_email(&request.email)
        .await?
        .ok_or(AppError::AuthRequired)?;

    if !verify_password(&request.password, &user.password_hash)? {
        return Err(AppError::AuthRequired);
    }

    let token = state.sessions.issue(&user)?;

    Ok(Json(LoginResponse {
        token,
        user: UserResponse::from(&user),
    }))
}

/// Returns the profile of the authenticated caller
pub async fn me(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .users
        .find_by_id(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from(&user)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_regex_accepts_plain_addresses() {
        assert!(email_regex().is_match("learner@example.com"));
        assert!(email_regex().is_match("a.b+c@sub.example.org"));
    }

    #[test]
    fn test_email_regex_rejects_garbage() {
        assert!(!email_regex().is_match("not-an-email"));
        assert!(!email_regex().is_match("spaces in@example.com"));
        assert!(!email_regex().is_match("missing@tld"));
    }

    #[test]
    fn test_client_key_uses_first_forwarded_address() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "1.2.3.4, 10.0.0.1".parse().unwrap());
        assert_eq!(client_key(&headers), "1.2.3.4");
    }

    #[test]
    fn test_client_key_defaults_to_unknown() {
        assert_eq!(client_key(&HeaderMap::new()), "unknown");
    }
}
