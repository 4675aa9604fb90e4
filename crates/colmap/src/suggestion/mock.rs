//! Mock suggestion client for testing and offline runs.

use std::sync::Mutex;

use indexmap::IndexMap;

use crate::error::{ColmapError, Result};

use super::client::SuggestionClient;
use super::suggestion::{Suggestion, SuggestionRequest, SuggestionSet};

/// Suggestion client that returns predictable responses.
///
/// Requested fields without a canned suggestion get their snake_case form as
/// the primary name. With `echo_samples`, every sampled value also gets an
/// entry, which is how a real model keys its replies for field-name columns.
pub struct MockSuggestionClient {
    canned: IndexMap<String, Suggestion>,
    omitted: Vec<String>,
    failure: Option<String>,
    echo_samples: bool,
    requests: Mutex<Vec<SuggestionRequest>>,
}

impl MockSuggestionClient {
    /// Create a new mock client.
    pub fn new() -> Self {
        Self {
            canned: IndexMap::new(),
            omitted: Vec::new(),
            failure: None,
            echo_samples: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with this suggestion for `key`.
    pub fn with_suggestion(mut self, key: impl Into<String>, suggestion: Suggestion) -> Self {
        self.canned.insert(key.into(), suggestion);
        self
    }

    /// Leave `key` out of every response.
    pub fn omitting(mut self, key: impl Into<String>) -> Self {
        self.omitted.push(key.into());
        self
    }

    /// Fail every request with a service error.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Add an entry for every non-empty sampled value.
    pub fn echo_samples(mut self, enabled: bool) -> Self {
        self.echo_samples = enabled;
        self
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<SuggestionRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    fn suggest(&self, key: &str) -> Suggestion {
        self.canned
            .get(key)
            .cloned()
            .unwrap_or_else(|| Suggestion::new(snake_case(key)))
    }
}

impl Default for MockSuggestionClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SuggestionClient for MockSuggestionClient {
    fn request_suggestions(&self, request: &SuggestionRequest) -> Result<SuggestionSet> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        if let Some(ref message) = self.failure {
            return Err(ColmapError::Service(message.clone()));
        }

        let mut set = SuggestionSet::new();
        for (column, sample) in &request.data {
            set.insert(column.clone(), self.suggest(column));

            if self.echo_samples {
                for value in sample.present() {
                    let key = value.trim();
                    if !key.is_empty() && !set.contains(key) {
                        set.insert(key, self.suggest(key));
                    }
                }
            }
        }

        for key in &self.omitted {
            set = set
                .iter()
                .filter(|(k, _)| *k != key.as_str())
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect();
        }

        Ok(set)
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Lowercase, with runs of non-alphanumerics collapsed to `_`.
fn snake_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.trim().chars() {
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_matches('_').to_string()
}
