//! Per-key decision state for one review session.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ColmapError, Result};
use crate::suggestion::SuggestionSet;

use super::decision::Decision;

/// Counts shown while reviewing ("N of M mappings accepted").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionSummary {
    /// Decisions currently accepted.
    pub accepted: usize,
    /// All decisions.
    pub total: usize,
}

impl DecisionSummary {
    /// Decisions currently rejected.
    pub fn rejected(&self) -> usize {
        self.total - self.accepted
    }
}

/// Decisions keyed by suggestion key, in response order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecisionStore {
    decisions: IndexMap<String, Decision>,
}

impl DecisionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed one accepted decision per suggestion, mapping to its primary.
    pub fn seed(suggestions: &SuggestionSet) -> Self {
        let decisions = suggestions
            .iter()
            .map(|(key, sug)| (key.to_string(), Decision::seeded(sug)))
            .collect();
        Self { decisions }
    }

    /// Decision for a key.
    pub fn get(&self, key: &str) -> Option<&Decision> {
        self.decisions.get(key)
    }

    /// Flip acceptance for a key; the selected mapping is kept.
    pub fn toggle_acceptance(&mut self, key: &str) -> Result<&Decision> {
        let decision = self.decisions.get_mut(key).ok_or_else(|| unknown_key(key))?;
        decision.toggle();
        debug!(key, accepted = decision.accepted, "toggled acceptance");
        Ok(decision)
    }

    /// Choose the replacement value for a key; acceptance is kept.
    ///
    /// The candidate must be one of the suggestion's choices.
    pub fn select_alternative(
        &mut self,
        key: &str,
        candidate: &str,
        suggestions: &SuggestionSet,
    ) -> Result<&Decision> {
        let suggestion = suggestions.get(key).ok_or_else(|| unknown_key(key))?;
        if !suggestion.offers(candidate) {
            return Err(ColmapError::Validation(format!(
                "'{}' is not a suggested mapping for '{}'",
                candidate, key
            )));
        }

        let decision = self.decisions.get_mut(key).ok_or_else(|| unknown_key(key))?;
        decision.selected_mapping = candidate.to_string();
        debug!(key, mapping = candidate, "selected alternative");
        Ok(decision)
    }

    /// Accepted keys and their mappings, in response order.
    pub fn accepted_mappings(&self) -> IndexMap<String, String> {
        self.decisions
            .iter()
            .filter(|(_, d)| d.accepted)
            .map(|(k, d)| (k.clone(), d.selected_mapping.clone()))
            .collect()
    }

    /// Accepted and total counts.
    pub fn summary(&self) -> DecisionSummary {
        DecisionSummary {
            accepted: self.decisions.values().filter(|d| d.accepted).count(),
            total: self.decisions.len(),
        }
    }

    /// Entries in response order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Decision)> {
        self.decisions.iter().map(|(k, d)| (k.as_str(), d))
    }

    /// Number of decisions.
    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }

    /// Drop every decision.
    pub fn clear(&mut self) {
        self.decisions.clear();
    }
}

impl<K: Into<String>> FromIterator<(K, Decision)> for DecisionStore {
    fn from_iter<I: IntoIterator<Item = (K, Decision)>>(iter: I) -> Self {
        Self {
            decisions: iter.into_iter().map(|(k, d)| (k.into(), d)).collect(),
        }
    }
}

fn unknown_key(key: &str) -> ColmapError {
    ColmapError::Validation(format!("no suggestion for '{}'", key))
}
