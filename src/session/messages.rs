use serde::{Deserialize, Serialize};

/// User-facing texts carried by [`crate::session::RequestState::Failed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    /// Shown when a fetch is requested with no artist selected.
    pub validation: String,
    /// Shown for transport failures, non-2xx answers and service errors without a message.
    pub server_error: String,
    /// Shown when none of the selected artists are known to the service.
    pub no_results: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            validation: "Please, select at least one artist".to_string(),
            server_error: "Error getting recommendations. Is the server running?".to_string(),
            no_results: "None of the selected artists were found".to_string(),
        }
    }
}
