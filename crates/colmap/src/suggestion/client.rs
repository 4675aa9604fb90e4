//! Suggestion client trait and the HTTP implementation.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use tracing::debug;

use crate::error::{ColmapError, Result};

use super::suggestion::{SuggestionRequest, SuggestionSet};

/// Default address of the normalize endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/api/normalize";

/// Boundary to a service that proposes normalized names.
///
/// One call covers the whole batch of selected columns. Implementations
/// report transport failures, non-success statuses, and undecodable bodies
/// as [`ColmapError::Service`]. Implementations must be thread-safe so the
/// review server can call them from a blocking task.
pub trait SuggestionClient: Send + Sync {
    /// Request suggestions for every field in the batch.
    fn request_suggestions(&self, request: &SuggestionRequest) -> Result<SuggestionSet>;

    /// Get the name of this client (for logging).
    fn name(&self) -> &str;
}

/// Client for the JSON normalize endpoint.
pub struct HttpSuggestionClient {
    client: Client,
    endpoint: String,
}

impl HttpSuggestionClient {
    /// Create a client for the given endpoint with a 120 second timeout.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Self::with_timeout(endpoint, Duration::from_secs(120))
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ColmapError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// The endpoint this client posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }
}

impl SuggestionClient for HttpSuggestionClient {
    fn request_suggestions(&self, request: &SuggestionRequest) -> Result<SuggestionSet> {
        debug!(endpoint = %self.endpoint, columns = request.len(), "posting suggestion request");

        let response = self
            .client
            .post(&self.endpoint)
            .headers(Self::build_headers())
            .json(request)
            .send()
            .map_err(|e| ColmapError::Service(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ColmapError::Service(if body.is_empty() {
                format!("Server error: {}", status.as_u16())
            } else {
                format!("Server error: {}: {}", status.as_u16(), body)
            }));
        }

        let body = response
            .text()
            .map_err(|e| ColmapError::Service(format!("failed to read response: {}", e)))?;

        SuggestionSet::from_json(&body)
            .map_err(|e| ColmapError::Service(format!("invalid response body: {}", e)))
    }

    fn name(&self) -> &str {
        "http"
    }
}
