//! Client for the artist recommendation backend.
//!
//! The backend answers `POST /recommend` with a paginated slice of similar artists
//! and a `GET /health` probe. Only transport concerns live here; turning a payload
//! into session state is the job of [`crate::session::RecommendationSession`].

use crate::api_client::RecommendError;
use crate::configuration::ApiSettings;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

/// Number of recommendations requested per page.
pub const PAGE_SIZE: usize = 5;

/// Body of `POST /recommend`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecommendRequest {
    pub artists: Vec<String>,
    pub limit: usize,
    pub offset: usize,
}

/// Payload returned by `POST /recommend`.
///
/// Fields the backend may omit default to their empty value so that a
/// `success: false` body without `data` still decodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RecommendResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<RecommendData>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub total_found: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RecommendData {
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub not_found_artists: Vec<String>,
    #[serde(default)]
    pub found_artists: Vec<String>,
}

impl RecommendResponse {
    pub fn recommendations(&self) -> &[String] {
        self.data
            .as_ref()
            .map(|d| d.recommendations.as_slice())
            .unwrap_or_default()
    }

    pub fn not_found_artists(&self) -> &[String] {
        self.data
            .as_ref()
            .map(|d| d.not_found_artists.as_slice())
            .unwrap_or_default()
    }
}

/// Answer of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub total_artists: u64,
}

/// The recommendation backend as seen by the session.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RecommendationService: Send + Sync {
    async fn recommend(
        &self,
        request: &RecommendRequest,
    ) -> Result<RecommendResponse, RecommendError>;
}

/// [`RecommendationService`] backed by the HTTP API.
pub struct HttpRecommendationService {
    client: Client,
    base_url: String,
}

impl HttpRecommendationService {
    /// Builds a client for the backend described by `settings`.
    ///
    /// Timeouts are enforced by the HTTP client and surface as
    /// [`RecommendError::Transport`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dondisco::{ApiSettings, HttpRecommendationService};
    ///
    /// let settings = ApiSettings::new("http://localhost:8000", 10);
    /// let service = HttpRecommendationService::new(&settings).unwrap();
    /// ```
    pub fn new(settings: &ApiSettings) -> Result<Self, RecommendError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn health(&self) -> Result<HealthStatus, RecommendError> {
        let url = format!("{}/health", self.base_url);
        let status = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(status)
    }
}

#[async_trait]
impl RecommendationService for HttpRecommendationService {
    async fn recommend(
        &self,
        request: &RecommendRequest,
    ) -> Result<RecommendResponse, RecommendError> {
        let url = format!("{}/recommend", self.base_url);
        debug!(
            artists = ?request.artists,
            offset = request.offset,
            limit = request.limit,
            "requesting recommendations"
        );

        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = error_message(&body);
            error!(status = status.as_u16(), ?message, "recommendation request rejected");
            return Err(RecommendError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

fn error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| v["message"].as_str().map(str::to_string))
}
