//! Application state for the web server.

use std::sync::Arc;
use tokio::sync::RwLock;

use colmap::{ChatSuggestionClient, MappingSession, SessionConfig, SuggestionClient};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The mapping session driven by the API.
    pub session: Arc<RwLock<MappingSession>>,
    /// Client the session asks for suggestions.
    pub client: Arc<dyn SuggestionClient>,
    /// Chat client behind `POST /api/normalize`.
    /// If None, the endpoint answers with a configuration error.
    pub normalizer: Option<Arc<ChatSuggestionClient>>,
}

impl AppState {
    /// Create new application state.
    pub fn new(config: SessionConfig, client: Arc<dyn SuggestionClient>) -> Self {
        Self {
            session: Arc::new(RwLock::new(MappingSession::with_config(config))),
            client,
            normalizer: None,
        }
    }

    /// Serve the normalize endpoint with this chat client.
    pub fn with_normalizer(mut self, normalizer: Arc<ChatSuggestionClient>) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    /// Name of the configured suggestion client (for display).
    pub fn client_name(&self) -> &str {
        self.client.name()
    }
}
