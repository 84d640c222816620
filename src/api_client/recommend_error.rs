use reqwest::Error as ReqwestError;
use thiserror::Error;

/// Failure talking to the recommendation backend.
///
/// Every variant is a transport-class failure from the session's point of view:
/// the request did not produce a well-formed payload.
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("Transport error: {0}")]
    Transport(#[from] ReqwestError),

    #[error("Unexpected HTTP status {status}")]
    Status { status: u16, message: Option<String> },

    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl RecommendError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, RecommendError::Transport(e) if e.is_timeout())
    }
}

/// Failure of the artist-name autocomplete lookup. Never reaches the session state.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Transport error: {0}")]
    Transport(#[from] ReqwestError),

    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    #[error("Search API error ({code}): {message}")]
    Api { code: i64, message: String },
}
