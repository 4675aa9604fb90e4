//! A single review decision.

use serde::{Deserialize, Serialize};

use crate::suggestion::Suggestion;

/// The user's verdict on one suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    /// Whether the mapping will be applied.
    pub accepted: bool,

    /// Replacement value: the primary or one of the alternatives.
    pub selected_mapping: String,
}

impl Decision {
    /// Default decision for a fresh suggestion: accept the primary.
    pub fn seeded(suggestion: &Suggestion) -> Self {
        Self {
            accepted: true,
            selected_mapping: suggestion.primary.clone(),
        }
    }

    /// Flip acceptance, keeping the mapping.
    pub fn toggle(&mut self) {
        self.accepted = !self.accepted;
    }
}
