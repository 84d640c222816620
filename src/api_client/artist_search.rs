//! Artist name autocomplete backed by the Last.fm `artist.search` method.

use crate::api_client::SearchError;
use crate::configuration::SearchSettings;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Shortest partial name worth sending to the search API.
pub const MIN_QUERY_LEN: usize = 3;

/// Maximum number of candidates returned per lookup.
pub const MAX_CANDIDATES: usize = 5;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ArtistNameSearch: Send + Sync {
    /// Returns up to [`MAX_CANDIDATES`] artist names matching `partial`.
    async fn search(&self, partial: &str) -> Result<Vec<String>, SearchError>;
}

pub struct LastFmArtistSearch {
    client: Client,
    base_url: String,
    api_key: String,
}

impl LastFmArtistSearch {
    pub fn new(settings: &SearchSettings) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
            api_key: settings.api_key.clone(),
        })
    }
}

#[async_trait]
impl ArtistNameSearch for LastFmArtistSearch {
    async fn search(&self, partial: &str) -> Result<Vec<String>, SearchError> {
        let partial = partial.trim();
        if partial.chars().count() < MIN_QUERY_LEN || self.api_key.is_empty() {
            return Ok(Vec::new());
        }

        debug!(partial, "searching artist names");
        let limit = MAX_CANDIDATES.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("method", "artist.search"),
                ("artist", partial),
                ("api_key", self.api_key.as_str()),
                ("format", "json"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status.as_u16()));
        }

        let body: Value = response.json().await?;
        parse_artist_matches(&body)
    }
}

/// Extracts `results.artistmatches.artist[].name` from a Last.fm search payload.
fn parse_artist_matches(body: &Value) -> Result<Vec<String>, SearchError> {
    if let Some(code) = body["error"].as_i64() {
        return Err(SearchError::Api {
            code,
            message: body["message"]
                .as_str()
                .unwrap_or("Unknown error")
                .to_string(),
        });
    }

    Ok(body["results"]["artistmatches"]["artist"]
        .as_array()
        .map(|artists| {
            artists
                .iter()
                .filter_map(|artist| artist["name"].as_str().map(str::to_string))
                .take(MAX_CANDIDATES)
                .collect()
        })
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_artist_matches() {
        let body = json!({
            "results": {
                "artistmatches": {
                    "artist": [
                        { "name": "Radiohead", "listeners": "1" },
                        { "name": "Radiohead Tribute" },
                        { "listeners": "3" }
                    ]
                }
            }
        });

        let names = parse_artist_matches(&body).unwrap();
        assert_eq!(names, vec!["Radiohead", "Radiohead Tribute"]);
    }

    #[test]
    fn test_parse_caps_candidates() {
        let artists: Vec<_> = (0..8).map(|i| json!({ "name": format!("A{i}") })).collect();
        let body = json!({ "results": { "artistmatches": { "artist": artists } } });

        assert_eq!(parse_artist_matches(&body).unwrap().len(), MAX_CANDIDATES);
    }

    #[test]
    fn test_parse_api_error() {
        let body = json!({ "error": 10, "message": "Invalid API key" });

        match parse_artist_matches(&body) {
            Err(SearchError::Api { code, message }) => {
                assert_eq!(code, 10);
                assert_eq!(message, "Invalid API key");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_missing_results() {
        assert!(parse_artist_matches(&json!({})).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_short_query_skips_network() {
        let settings = SearchSettings {
            base_url: "http://127.0.0.1:9".into(),
            api_key: "key".into(),
            timeout_secs: 1,
        };
        let search = LastFmArtistSearch::new(&settings).unwrap();

        assert!(search.search("ra").await.unwrap().is_empty());
        assert!(search.search("  r  ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_api_key_skips_network() {
        let settings = SearchSettings {
            base_url: "http://127.0.0.1:9".into(),
            api_key: String::new(),
            timeout_secs: 1,
        };
        let search = LastFmArtistSearch::new(&settings).unwrap();

        assert!(search.search("Radiohead").await.unwrap().is_empty());
    }
}
