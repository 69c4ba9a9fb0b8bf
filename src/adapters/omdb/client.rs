//! OMDb adapter. Implements `MetadataPort` over the OMDb REST API.
//!
//! One GET per lookup, filtered to movies. The upstream reports "not found" as a
//! 200 with `"Response": "False"`, so the body decides the outcome, not the status.

use crate::domain::{DomainError, MovieMetadata};
use crate::ports::MetadataPort;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Public OMDb endpoint.
pub const DEFAULT_OMDB_URL: &str = "http://www.omdbapi.com/";

/// Used when the upstream reports failure without a message.
const DEFAULT_NOT_FOUND: &str = "Movie not found!";

/// OMDb HTTP client.
pub struct OmdbAdapter {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl OmdbAdapter {
    /// Create a new OMDb adapter.
    ///
    /// # Arguments
    /// * `api_url` - API endpoint (e.g., "http://www.omdbapi.com/")
    /// * `api_key` - OMDb API key (sent as the `apikey` query parameter)
    /// * `timeout` - Per-request timeout
    pub fn new(api_url: String, api_key: String, timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Upstream(format!("HTTP client init failed: {}", e)))?;
        Ok(Self {
            client,
            api_url,
            api_key,
        })
    }
}

/// OMDb response body. Only the fields we relay.
#[derive(Debug, Deserialize)]
struct OmdbResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "imdbRating", default)]
    imdb_rating: String,
    #[serde(rename = "Plot", default)]
    plot: String,
    #[serde(rename = "Poster", default)]
    poster: String,
}

impl OmdbResponse {
    fn into_metadata(self) -> Result<MovieMetadata, DomainError> {
        if self.response.eq_ignore_ascii_case("false") {
            let msg = self
                .error
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| DEFAULT_NOT_FOUND.to_string());
            return Err(DomainError::NotFound(msg));
        }
        Ok(MovieMetadata {
            title: self.title,
            rating: self.imdb_rating,
            plot: self.plot,
            poster: self.poster,
        })
    }
}

#[async_trait::async_trait]
impl MetadataPort for OmdbAdapter {
    async fn lookup_title(&self, title: &str) -> Result<MovieMetadata, DomainError> {
        debug!(title, "querying OMDb");

        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("t", title),
                ("type", "movie"),
            ])
            .send()
            .await
            .map_err(|e| DomainError::Upstream(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %text, "OMDb returned error status");
            return Err(DomainError::Upstream(format!(
                "API error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        let body: OmdbResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Upstream(format!("Failed to parse API response: {}", e)))?;

        let metadata = body.into_metadata()?;
        info!(title, found = %metadata.title, "OMDb lookup complete");
        Ok(metadata)
    }
}
