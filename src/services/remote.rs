//! Remote model-backend recommender.
//!
//! The platform can defer ranking to an external model service when one
//! is configured. Availability is probed per request: any transport or
//! decode failure makes the caller fall back to the in-process heuristic.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::CourseRecord;

use super::recommender::{Recommendation, RecommendationResult};

/// A source of ranked course recommendations for a user
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Recommender: Send + Sync {
    async fn recommend(&self, user_id: &str, top_k: usize) -> AppResult<RecommendationResult>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RemoteRequest<'a> {
    user_id: &'a str,
    top_k: usize,
}

#[derive(Debug, Deserialize)]
struct RemoteResponse {
    #[serde(default)]
    recommendations: Vec<CourseRecord>,
    #[serde(default)]
    message: Option<String>,
}

/// Client for the external model backend
#[derive(Clone)]
pub struct RemoteRecommender {
    http_client: reqwest::Client,
    base_url: String,
}

impl RemoteRecommender {
    pub fn new(base_url: String) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url,
        }
    }
}

#[async_trait::async_trait]
impl Recommender for RemoteRecommender {
    async fn recommend(&self, user_id: &str, top_k: usize) -> AppResult<RecommendationResult> {
        let url = format!("{}/recommend", self.base_url.trim_end_matches('/'));
        let response = self
            .http_client
            .post(&url)
            .json(&RemoteRequest { user_id, top_k })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::DataUnavailable(format!(
                "Model backend returned {}",
                response.status()
            )));
        }

        let body: RemoteResponse = response.json().await?;

        Ok(RecommendationResult {
            recommendations: body
                .recommendations
                .into_iter()
                .map(|course| Recommendation {
                    course,
                    score: None,
                })
                .collect(),
            message: body
                .message
                .unwrap_or_else(|| "Recommendations from the model backend".to_string()),
            debug: None,
        })
    }
}

/// Asks the remote backend when one is configured.
///
/// `None` means the caller should run the heuristic engine instead.
pub async fn try_remote(
    remote: Option<&dyn Recommender>,
    user_id: &str,
    top_k: usize,
) -> Option<RecommendationResult> {
    let remote = remote?;
    match remote.recommend(user_id, top_k).await {
        Ok(result) => Some(result),
        Err(e) => {
            tracing::warn!(error = %e, "Model backend unavailable, falling back to heuristic");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_try_remote_without_backend() {
        assert!(try_remote(None, "user", 5).await.is_none());
    }

    #[tokio::test]
    async fn test_try_remote_falls_back_on_error() {
        let mut remote = MockRecommender::new();
        remote
            .expect_recommend()
            .returning(|_, _| Err(AppError::DataUnavailable("backend offline".to_string())));

        assert!(try_remote(Some(&remote), "user", 5).await.is_none());
    }

    #[tokio::test]
    async fn test_try_remote_passes_result_through() {
        let mut remote = MockRecommender::new();
        remote.expect_recommend().returning(|_, _| {
            Ok(RecommendationResult {
                recommendations: Vec::new(),
                message: "from the model".to_string(),
                debug: None,
            })
        });

        let result = try_remote(Some(&remote), "user", 5).await.unwrap();
        assert_eq!(result.message, "from the model");
    }
}
