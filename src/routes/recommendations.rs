use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::db::RECENT_VIEW_LIMIT;
use crate::error::{AppError, AppResult};
use crate::services::recommender::{self, DEFAULT_TOP_K};
use crate::services::remote::try_remote;
use crate::services::RecommendationResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecommendationParams {
    #[serde(rename = "topK")]
    pub top_k: Option<usize>,
}

/// Personalized recommendations for the authenticated caller
pub async fn personalized(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<RecommendationParams>,
) -> AppResult<Json<RecommendationResult>> {
    let top_k = params.top_k.unwrap_or(DEFAULT_TOP_K);
    if top_k == 0 {
        return Err(AppError::InvalidInput(
            "topK must be a positive integer".to_string(),
        ));
    }

    // A configured model backend gets the first shot; the heuristic is
    // the always-available fallback.
    if let Some(result) = try_remote(state.remote.as_deref(), &user.id.to_string(), top_k).await {
        return Ok(Json(result));
    }

    let views = state.views.recent_views(user.id, RECENT_VIEW_LIMIT).await?;
    let table = state.catalog.load().await?;

    let result = recommender::recommend(&views, &table, top_k);

    Ok(Json(result))
}
