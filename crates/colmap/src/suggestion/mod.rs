//! Suggestion retrieval.
//!
//! A [`SuggestionClient`] turns a batch of column samples into normalized-name
//! candidates in a single round trip.
//!
//! # Providers
//!
//! - **HTTP** - posts `{"data": {...}}` to a normalize endpoint
//! - **Chat** - prompts an OpenAI-compatible chat model directly (requires `GROK_API_KEY`)
//! - **Mock** - deterministic, offline, used by tests

mod chat;
mod client;
mod mock;
mod prompts;
mod suggestion;

pub use chat::{parse_json_reply, ChatConfig, ChatSuggestionClient, API_KEY_ENV};
pub use client::{HttpSuggestionClient, SuggestionClient, DEFAULT_ENDPOINT};
pub use mock::MockSuggestionClient;
pub use prompts::{normalization_prompt, samples_csv};
pub use suggestion::{Suggestion, SuggestionRequest, SuggestionSet};
