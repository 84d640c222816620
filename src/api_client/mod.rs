mod artist_search;
mod recommend;
mod recommend_error;

pub use artist_search::*;
pub use recommend::*;
pub use recommend_error::{RecommendError, SearchError};
