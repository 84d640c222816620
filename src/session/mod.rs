//! Artist selection and paginated recommendation retrieval.

mod artist_set;
mod controller;
mod messages;
mod recommendation_session;
mod state;

pub use artist_set::{ArtistSet, MAX_ARTISTS};
pub use controller::{SessionController, SessionSnapshot};
pub use messages::Messages;
pub use recommendation_session::RecommendationSession;
pub use state::{
    FetchFailure, FetchKind, FetchQuery, RecommendationPage, RequestState, SessionError,
};
