use crate::api_client::{RecommendError, RecommendRequest, PAGE_SIZE};
use crate::session::Messages;
use serde::Serialize;
use thiserror::Error;

/// Lifecycle of the outbound recommendation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message")]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    LoadingMore,
    Failed(String),
}

impl RequestState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, RequestState::Loading | RequestState::LoadingMore)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RequestState::Failed(_))
    }
}

/// Recommendations accumulated across every page fetched for the current query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecommendationPage {
    pub items: Vec<String>,
    /// Number of items requested so far, always a multiple of the page size.
    pub offset: usize,
    pub total_found: usize,
    pub has_more: bool,
    /// Selected artists the service did not recognise. Advisory only.
    pub not_found: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Fresh,
    More,
}

/// Snapshot of one outbound request.
///
/// The artist list is what makes a response valid: it must still equal the
/// live selection when the response arrives. The ticket tells apart two
/// requests issued for the same list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchQuery {
    pub ticket: u64,
    pub kind: FetchKind,
    pub artists: Vec<String>,
    pub offset: usize,
    pub page_size: usize,
}

impl FetchQuery {
    pub(crate) fn new(ticket: u64, kind: FetchKind, artists: Vec<String>, offset: usize) -> Self {
        Self {
            ticket,
            kind,
            artists,
            offset,
            page_size: PAGE_SIZE,
        }
    }

    pub fn to_request(&self) -> RecommendRequest {
        RecommendRequest {
            artists: self.artists.clone(),
            limit: self.page_size,
            offset: self.offset,
        }
    }

    pub fn matches(&self, live_artists: &[String]) -> bool {
        self.artists == live_artists
    }
}

/// Every way a fetch can fail, each recovered into [`RequestState::Failed`].
#[derive(Debug, Error)]
pub enum FetchFailure {
    #[error("no artist selected")]
    Validation,

    #[error(transparent)]
    Transport(#[from] RecommendError),

    #[error("service reported failure: {}", .0.as_deref().unwrap_or("no message"))]
    Service(Option<String>),

    #[error("none of the selected artists were found")]
    NoResults,
}

impl FetchFailure {
    pub fn user_message(&self, messages: &Messages) -> String {
        match self {
            FetchFailure::Validation => messages.validation.clone(),
            FetchFailure::Transport(_) => messages.server_error.clone(),
            FetchFailure::Service(Some(message)) if !message.trim().is_empty() => message.clone(),
            FetchFailure::Service(_) => messages.server_error.clone(),
            FetchFailure::NoResults => messages.no_results.clone(),
        }
    }
}

/// Misuse of the session API. Leaves the session untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("there are no more recommendations to load")]
    NothingMoreToLoad,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_messages() {
        let messages = Messages::default();

        assert_eq!(
            FetchFailure::Validation.user_message(&messages),
            messages.validation
        );
        assert_eq!(
            FetchFailure::NoResults.user_message(&messages),
            messages.no_results
        );
        assert_eq!(
            FetchFailure::Service(Some("Offset out of range".into())).user_message(&messages),
            "Offset out of range"
        );
        assert_eq!(
            FetchFailure::Service(None).user_message(&messages),
            messages.server_error
        );
        assert_eq!(
            FetchFailure::Service(Some("  ".into())).user_message(&messages),
            messages.server_error
        );
        let status = RecommendError::Status {
            status: 500,
            message: Some("internal".into()),
        };
        assert_eq!(
            FetchFailure::from(status).user_message(&messages),
            messages.server_error
        );
    }

    #[test]
    fn test_query_matches_by_value() {
        let query = FetchQuery::new(1, FetchKind::Fresh, vec!["A".into(), "B".into()], 0);

        assert!(query.matches(&["A".to_string(), "B".to_string()]));
        assert!(!query.matches(&["B".to_string(), "A".to_string()]));
        assert!(!query.matches(&["A".to_string()]));
        assert_eq!(query.to_request().limit, PAGE_SIZE);
    }

    #[test]
    fn test_request_state_serializes_tagged() {
        let failed = serde_json::to_value(RequestState::Failed("oops".into())).unwrap();
        assert_eq!(failed, serde_json::json!({ "state": "Failed", "message": "oops" }));

        let idle = serde_json::to_value(RequestState::Idle).unwrap();
        assert_eq!(idle, serde_json::json!({ "state": "Idle" }));
    }
}
