//! Pagination protocol against the recommendation backend.
//!
//! A fetch is split in two phases so that callers can release the session
//! while the request is in flight: `begin_*` validates, moves the state to
//! `Loading`/`LoadingMore` and hands back the [`FetchQuery`] to send;
//! [`RecommendationSession::complete`] classifies whatever came back. The
//! async `fetch_*` drivers chain both phases for callers that own the session
//! for the whole round trip.

use crate::api_client::{RecommendError, RecommendResponse, RecommendationService};
use crate::session::{
    FetchFailure, FetchKind, FetchQuery, Messages, RecommendationPage, RequestState, SessionError,
};
use tracing::{debug, error, warn};

pub struct RecommendationSession {
    page: RecommendationPage,
    state: RequestState,
    messages: Messages,
    /// Artists of the last fresh fetch; load-more pages continue this query.
    query_artists: Vec<String>,
    in_flight: Option<u64>,
    next_ticket: u64,
}

/// A payload that produced recommendations.
struct PageResult {
    recommendations: Vec<String>,
    not_found: Vec<String>,
    total_found: usize,
    has_more: bool,
}

impl RecommendationSession {
    pub fn new(messages: Messages) -> Self {
        Self {
            page: RecommendationPage::default(),
            state: RequestState::Idle,
            messages,
            query_artists: Vec::new(),
            in_flight: None,
            next_ticket: 0,
        }
    }

    pub fn page(&self) -> &RecommendationPage {
        &self.page
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn query_artists(&self) -> &[String] {
        &self.query_artists
    }

    /// Starts a fetch of the first page for `artists`, discarding the current page.
    ///
    /// Returns `None` when nothing must be sent: a request is already in flight,
    /// or `artists` is empty, in which case the state becomes `Failed` with the
    /// validation message and the page is left alone.
    pub fn begin_fresh(&mut self, artists: &[String]) -> Option<FetchQuery> {
        if self.state.is_in_flight() {
            debug!("fresh fetch ignored, a request is already in flight");
            return None;
        }
        if artists.is_empty() {
            self.fail(FetchFailure::Validation);
            return None;
        }

        self.page = RecommendationPage::default();
        self.state = RequestState::Loading;
        self.query_artists = artists.to_vec();
        Some(self.issue(FetchKind::Fresh, 0))
    }

    /// Starts a fetch of the next page of the current query.
    ///
    /// A call while a request is in flight is a no-op (`Ok(None)`). Asking for
    /// more when the page reports nothing more is a caller bug and is rejected
    /// with [`SessionError::NothingMoreToLoad`] without touching any state.
    pub fn begin_more(&mut self) -> Result<Option<FetchQuery>, SessionError> {
        if self.state.is_in_flight() {
            debug!("load-more ignored, a request is already in flight");
            return Ok(None);
        }
        if !self.page.has_more {
            return Err(SessionError::NothingMoreToLoad);
        }

        self.state = RequestState::LoadingMore;
        Ok(Some(self.issue(FetchKind::More, self.page.offset)))
    }

    fn issue(&mut self, kind: FetchKind, offset: usize) -> FetchQuery {
        self.next_ticket += 1;
        self.in_flight = Some(self.next_ticket);
        FetchQuery::new(self.next_ticket, kind, self.query_artists.clone(), offset)
    }

    /// Applies the outcome of `query`.
    ///
    /// The outcome is dropped when `query` is not the request in flight or was
    /// issued for a different artist list than `live_artists`. Returns whether
    /// the outcome was applied.
    pub fn complete(
        &mut self,
        query: &FetchQuery,
        outcome: Result<RecommendResponse, RecommendError>,
        live_artists: &[String],
    ) -> bool {
        if self.in_flight != Some(query.ticket) || !query.matches(live_artists) {
            debug!(
                ticket = query.ticket,
                artists = ?query.artists,
                "discarding stale recommendation response"
            );
            return false;
        }
        self.in_flight = None;

        match classify(outcome) {
            Ok(result) => self.apply(query, result),
            Err(failure) => self.fail(failure),
        }
        true
    }

    fn apply(&mut self, query: &FetchQuery, result: PageResult) {
        debug!(
            kind = ?query.kind,
            received = result.recommendations.len(),
            total_found = result.total_found,
            has_more = result.has_more,
            "recommendation page received"
        );

        match query.kind {
            FetchKind::Fresh => self.page.items = result.recommendations,
            FetchKind::More => self.page.items.extend(result.recommendations),
        }
        self.page.offset = query.offset + query.page_size;
        self.page.total_found = result.total_found;
        self.page.has_more = result.has_more;
        self.page.not_found = result.not_found;
        self.state = RequestState::Idle;
    }

    fn fail(&mut self, failure: FetchFailure) {
        match &failure {
            FetchFailure::Transport(e) => {
                error!(error = %e, timeout = e.is_timeout(), "recommendation request failed")
            }
            FetchFailure::NoResults => self.page.total_found = 0,
            _ => debug!(%failure, "recommendation request failed"),
        }
        if !matches!(failure, FetchFailure::Validation) {
            self.page.has_more = false;
        }
        self.state = RequestState::Failed(failure.user_message(&self.messages));
    }

    /// Drops the current page and forgets any request in flight, whose response
    /// will then be ignored on arrival.
    pub fn invalidate(&mut self) {
        if self.in_flight.take().is_some() {
            debug!("invalidated session with a request in flight");
        }
        self.page = RecommendationPage::default();
        self.state = RequestState::Idle;
        self.query_artists.clear();
    }

    /// Returns from `Failed` to `Idle`, keeping the page.
    pub fn dismiss_error(&mut self) {
        if self.state.is_failed() {
            self.state = RequestState::Idle;
        }
    }

    pub async fn fetch_fresh<S>(&mut self, service: &S, artists: &[String])
    where
        S: RecommendationService + ?Sized,
    {
        let Some(query) = self.begin_fresh(artists) else {
            return;
        };
        let outcome = service.recommend(&query.to_request()).await;
        self.complete(&query, outcome, artists);
    }

    pub async fn fetch_more<S>(&mut self, service: &S) -> Result<(), SessionError>
    where
        S: RecommendationService + ?Sized,
    {
        let Some(query) = self.begin_more()? else {
            return Ok(());
        };
        let outcome = service.recommend(&query.to_request()).await;
        self.complete(&query, outcome, &query.artists);
        Ok(())
    }
}

impl Default for RecommendationSession {
    fn default() -> Self {
        Self::new(Messages::default())
    }
}

fn classify(outcome: Result<RecommendResponse, RecommendError>) -> Result<PageResult, FetchFailure> {
    let response = outcome?;

    if !response.success {
        return Err(FetchFailure::Service(response.message));
    }
    if response.total_found == 0 {
        return Err(FetchFailure::NoResults);
    }

    let data = response.data.unwrap_or_default();
    let not_found = if data.recommendations.is_empty() {
        Vec::new()
    } else {
        data.not_found_artists
    };
    if !not_found.is_empty() {
        warn!(artists = ?not_found, "some selected artists were not found");
    }

    Ok(PageResult {
        recommendations: data.recommendations,
        not_found,
        total_found: response.total_found,
        has_more: response.has_more,
    })
}
