pub mod api_client;
pub mod configuration;
pub mod session;
pub mod startup;

pub use api_client::{
    ArtistNameSearch, HttpRecommendationService, LastFmArtistSearch, RecommendationService,
};
pub use configuration::*;
pub use session::{SessionController, SessionSnapshot};
