//! Composition root binding the artist selection to the recommendation session.
//!
//! Presentation code only talks to [`SessionController`]: it issues the
//! commands below and reads [`SessionSnapshot`]s. The owned tree sits behind a
//! mutex that is never held across an await, so a command may run while a
//! fetch is suspended on the network.

use crate::api_client::{ArtistNameSearch, RecommendationService, MIN_QUERY_LEN};
use crate::session::{
    ArtistSet, Messages, RecommendationPage, RecommendationSession, RequestState, SessionError,
};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

/// Read-only view handed to presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub artists: Vec<String>,
    pub page: RecommendationPage,
    pub request_state: RequestState,
}

struct SessionTree {
    artists: ArtistSet,
    session: RecommendationSession,
}

#[derive(Clone)]
pub struct SessionController {
    tree: Arc<Mutex<SessionTree>>,
    service: Arc<dyn RecommendationService>,
    search: Arc<dyn ArtistNameSearch>,
}

impl SessionController {
    pub fn new(
        service: Arc<dyn RecommendationService>,
        search: Arc<dyn ArtistNameSearch>,
        messages: Messages,
    ) -> Self {
        Self {
            tree: Arc::new(Mutex::new(SessionTree {
                artists: ArtistSet::new(),
                session: RecommendationSession::new(messages),
            })),
            service,
            search,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionTree> {
        self.tree.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds `name` to the selection. Any change drops the current recommendations.
    pub fn select_artist(&self, name: &str) -> bool {
        let mut tree = self.lock();
        let changed = tree.artists.add(name);
        if changed {
            tree.session.invalidate();
        }
        changed
    }

    pub fn remove_artist(&self, index: usize) -> bool {
        let mut tree = self.lock();
        let changed = tree.artists.remove(index);
        if changed {
            tree.session.invalidate();
        }
        changed
    }

    /// Clears the selection and the recommendations.
    pub fn reset(&self) {
        let mut tree = self.lock();
        tree.artists.clear();
        tree.session.invalidate();
    }

    /// Fetches the first page of recommendations for the current selection.
    pub async fn request_recommendations(&self) {
        let query = {
            let mut tree = self.lock();
            let artists = tree.artists.members().to_vec();
            tree.session.begin_fresh(&artists)
        };
        let Some(query) = query else {
            return;
        };

        let outcome = self.service.recommend(&query.to_request()).await;

        let mut tree = self.lock();
        let SessionTree { artists, session } = &mut *tree;
        session.complete(&query, outcome, artists.members());
    }

    /// Fetches the next page and appends it.
    ///
    /// A no-op while a request is in flight; rejected when the page has nothing more.
    pub async fn load_more(&self) -> Result<(), SessionError> {
        let query = self.lock().session.begin_more()?;
        let Some(query) = query else {
            return Ok(());
        };

        let outcome = self.service.recommend(&query.to_request()).await;

        let mut tree = self.lock();
        let SessionTree { artists, session } = &mut *tree;
        session.complete(&query, outcome, artists.members());
        Ok(())
    }

    pub fn dismiss_error(&self) {
        self.lock().session.dismiss_error();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let tree = self.lock();
        SessionSnapshot {
            artists: tree.artists.members().to_vec(),
            page: tree.session.page().clone(),
            request_state: tree.session.state().clone(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.lock().artists.is_full()
    }

    /// Autocomplete candidates for `partial`.
    ///
    /// Empty when the selection is full or `partial` is too short. Search
    /// failures are logged and yield no candidates.
    pub async fn suggest_artists(&self, partial: &str) -> Vec<String> {
        let full = self.is_full();
        if full || partial.trim().chars().count() < MIN_QUERY_LEN {
            debug!(full, partial, "artist search skipped");
            return Vec::new();
        }

        match self.search.search(partial.trim()).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(error = %e, partial, "artist search failed");
                Vec::new()
            }
        }
    }
}
