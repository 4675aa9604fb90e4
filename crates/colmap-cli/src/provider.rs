//! Suggestion client construction from CLI options.

use std::sync::Arc;

use colmap::{
    ChatConfig, ChatSuggestionClient, HttpSuggestionClient, MockSuggestionClient,
    SuggestionClient,
};

use crate::cli::{ProviderChoice, SessionOptions};

/// Build the suggestion client selected by `--provider`.
///
/// Must be called outside the async runtime: the HTTP clients are blocking.
pub fn build_client(
    options: &SessionOptions,
) -> Result<Arc<dyn SuggestionClient>, Box<dyn std::error::Error>> {
    let client: Arc<dyn SuggestionClient> = match options.provider {
        ProviderChoice::Http => Arc::new(HttpSuggestionClient::new(&options.endpoint)?),
        ProviderChoice::Chat => Arc::new(build_chat_client(options)?),
        ProviderChoice::Mock => Arc::new(MockSuggestionClient::new().echo_samples(true)),
    };
    Ok(client)
}

/// Build the chat client used by `--provider chat` and the normalize endpoint.
pub fn build_chat_client(
    options: &SessionOptions,
) -> Result<ChatSuggestionClient, Box<dyn std::error::Error>> {
    let mut config = ChatConfig::default();
    if let Some(model) = &options.model {
        config = config.with_model(model.clone());
    }
    Ok(ChatSuggestionClient::from_env(config)?)
}
