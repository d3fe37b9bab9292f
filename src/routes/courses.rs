use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::auth::CurrentUser;
use crate::error::{AppError, AppResult};
use crate::models::CourseRecord;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CourseListResponse {
    pub courses: Vec<CourseRecord>,
}

#[derive(Debug, Serialize)]
pub struct CourseResponse {
    pub course: CourseRecord,
}

/// Full catalog listing; open to anonymous callers
pub async fn list(State(state): State<AppState>) -> AppResult<Json<CourseListResponse>> {
    let table = state.catalog.load().await?;

    Ok(Json(CourseListResponse {
        courses: table.all().to_vec(),
    }))
}

/// Single course lookup
pub async fn by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<CourseResponse>> {
    let table = state.catalog.load().await?;
    let course = table
        .by_id(&id)
        .cloned()
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

    Ok(Json(CourseResponse { course }))
}

/// Records that the caller viewed a course.
///
/// Repeat views refresh the timestamp instead of adding rows; the id is
/// not checked against the catalog, matching the store's lenient policy.
pub async fn record_view(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    state.views.record_view(user.id, &id).await?;

    tracing::debug!(user_id = %user.id, course_id = %id, "Course view recorded");

    Ok(Json(json!({
        "success": true,
        "message": "Course view recorded"
    })))
}
