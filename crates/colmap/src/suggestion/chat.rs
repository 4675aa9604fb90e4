//! Suggestion provider backed by an OpenAI-compatible chat-completions API.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, trace};

use crate::error::{ColmapError, Result};

use super::client::SuggestionClient;
use super::prompts;
use super::suggestion::{SuggestionRequest, SuggestionSet};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "GROK_API_KEY";

/// Configuration for chat-completion providers.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// API base URL; `/chat/completions` is appended.
    pub base_url: String,

    /// Model to use.
    pub model: String,

    /// Maximum tokens in response.
    pub max_tokens: usize,

    /// Temperature for generation.
    pub temperature: f64,

    /// Request timeout.
    pub timeout: Duration,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.x.ai/v1".to_string(),
            model: "grok-4-1-fast-non-reasoning".to_string(),
            max_tokens: 2048,
            temperature: 0.0,
            timeout: Duration::from_secs(60),
        }
    }
}

impl ChatConfig {
    /// Use a different model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Use a different API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Asks a chat model for normalized names directly.
pub struct ChatSuggestionClient {
    client: Client,
    api_key: String,
    config: ChatConfig,
}

impl ChatSuggestionClient {
    /// Create a client with the given API key and default configuration.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, ChatConfig::default())
    }

    /// Create a client with custom configuration.
    pub fn with_config(api_key: impl Into<String>, config: ChatConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ColmapError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    /// Create from environment variable.
    pub fn from_env(config: ChatConfig) -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
            ColmapError::Config(format!("{} environment variable not set", API_KEY_ENV))
        })?;
        Self::with_config(api_key, config)
    }

    /// Get the configuration.
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Ask the model for suggestions.
    ///
    /// Transport and API failures are [`ColmapError::Service`]; a reply that is
    /// not the expected JSON object is [`ColmapError::Json`].
    pub fn complete(&self, request: &SuggestionRequest) -> Result<SuggestionSet> {
        let prompt = prompts::normalization_prompt(request)?;
        trace!(%prompt, "normalization prompt");

        let reply = self.send_message(&prompt)?;
        debug!(model = %self.config.model, bytes = reply.len(), "model replied");

        parse_json_reply(&reply)
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|e| ColmapError::Config(format!("Invalid API key: {}", e)))?,
        );
        Ok(headers)
    }

    fn send_message(&self, user_prompt: &str) -> Result<String> {
        let body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "messages": [
                {
                    "role": "system",
                    "content": prompts::system_prompt()
                },
                {
                    "role": "user",
                    "content": user_prompt
                }
            ]
        });

        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .headers(self.build_headers()?)
            .json(&body)
            .send()
            .map_err(|e| ColmapError::Service(format!("API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            return Err(ColmapError::Service(format!(
                "chat API error ({}): {}",
                status, error_text
            )));
        }

        let api_response: ChatResponse = response
            .json()
            .map_err(|e| ColmapError::Service(format!("Failed to parse API response: {}", e)))?;

        api_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| ColmapError::Service("No response from chat API".to_string()))
    }
}

impl SuggestionClient for ChatSuggestionClient {
    fn request_suggestions(&self, request: &SuggestionRequest) -> Result<SuggestionSet> {
        self.complete(request).map_err(|e| match e {
            ColmapError::Json(e) => ColmapError::Service(format!("model returned invalid JSON: {}", e)),
            other => other,
        })
    }

    fn name(&self) -> &str {
        "chat"
    }
}

/// Parse the model reply, tolerating Markdown code fences around the JSON.
pub fn parse_json_reply(reply: &str) -> Result<SuggestionSet> {
    let json_str = if reply.contains("```json") {
        reply
            .split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .map(|s| s.trim())
            .unwrap_or(reply)
    } else if reply.contains("```") {
        reply
            .split("```")
            .nth(1)
            .map(|s| s.trim())
            .unwrap_or(reply)
    } else {
        reply.trim()
    };

    SuggestionSet::from_json(json_str)
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_reply() {
        let set = parse_json_reply(r#" {"gew": {"primary": "weight", "alternatives": ["gew"]}} "#)
            .unwrap();
        assert_eq!(set.get("gew").unwrap().primary, "weight");
    }

    #[test]
    fn test_parse_fenced_reply() {
        let reply = "Here you go:\n```json\n{\"ssw\": {\"primary\": \"gestational_week\", \"alternatives\": []}}\n```";
        let set = parse_json_reply(reply).unwrap();
        assert_eq!(set.get("ssw").unwrap().primary, "gestational_week");

        let reply = "```\n{\"ssw\": {\"primary\": \"gestational_week\"}}\n```";
        assert!(parse_json_reply(reply).is_ok());
    }

    #[test]
    fn test_invalid_reply_is_json_error() {
        let err = parse_json_reply("I cannot help with that").unwrap_err();
        assert!(matches!(err, ColmapError::Json(_)));
    }

    #[test]
    fn test_config_builders() {
        let config = ChatConfig::default()
            .with_model("test-model")
            .with_base_url("http://localhost:9/v1/");
        assert_eq!(config.model, "test-model");
        assert_eq!(config.temperature, 0.0);

        let client = ChatSuggestionClient::with_config("key", config).unwrap();
        assert_eq!(client.name(), "chat");
    }
}
