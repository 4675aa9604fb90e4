//! Suggestion request and response types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ColmapError, Result};
use crate::input::Dataset;
use crate::selection::{Sample, SampleWindow, SelectedColumns};

/// Normalized-name candidates for one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Preferred normalized name.
    pub primary: String,

    /// Other acceptable names, in service order.
    #[serde(default)]
    pub alternatives: Vec<String>,
}

impl Suggestion {
    /// Create a suggestion with no alternatives.
    pub fn new(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            alternatives: Vec::new(),
        }
    }

    /// Add alternatives.
    pub fn with_alternatives<I, S>(mut self, alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alternatives = alternatives.into_iter().map(Into::into).collect();
        self
    }

    /// The choices offered to the user: primary first, then alternatives,
    /// without repeats.
    pub fn choices(&self) -> Vec<&str> {
        let mut out: Vec<&str> = vec![self.primary.as_str()];
        for alt in &self.alternatives {
            if !out.contains(&alt.as_str()) {
                out.push(alt);
            }
        }
        out
    }

    /// Whether a candidate is one of the offered choices.
    pub fn offers(&self, candidate: &str) -> bool {
        self.primary == candidate || self.alternatives.iter().any(|a| a == candidate)
    }
}

/// Batch payload sent to the suggestion service: `{"data": {field: sample}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionRequest {
    /// Sample per selected field name, in selection order.
    pub data: IndexMap<String, Sample>,
}

impl SuggestionRequest {
    /// Build the payload for the selected columns.
    pub fn build(dataset: &Dataset, selected: &SelectedColumns, window: SampleWindow) -> Self {
        let data = selected
            .iter()
            .map(|name| (name.to_string(), window.sample(dataset, name)))
            .collect();
        Self { data }
    }

    /// Requested field names in order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    /// Number of requested field names.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the request names no field.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Service response: suggestion per key, in response order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SuggestionSet(IndexMap<String, Suggestion>);

impl SuggestionSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a JSON response body.
    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    /// Add or replace the suggestion for a key.
    pub fn insert(&mut self, key: impl Into<String>, suggestion: Suggestion) {
        self.0.insert(key.into(), suggestion);
    }

    /// Suggestion for a key.
    pub fn get(&self, key: &str) -> Option<&Suggestion> {
        self.0.get(key)
    }

    /// Whether the set has a suggestion for a key.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Keys in response order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Entries in response order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Suggestion)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fail with a service error unless every requested field has an entry.
    pub fn ensure_covers(&self, request: &SuggestionRequest) -> Result<()> {
        let missing: Vec<&str> = request.columns().filter(|c| !self.contains(c)).collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ColmapError::Service(format!(
                "response has no suggestion for {}",
                missing
                    .iter()
                    .map(|m| format!("'{}'", m))
                    .collect::<Vec<_>>()
                    .join(", ")
            )))
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Suggestion)> for SuggestionSet {
    fn from_iter<I: IntoIterator<Item = (K, Suggestion)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_response() {
        let set = SuggestionSet::from_json(
            r#"{"age": {"primary": "Age", "alternatives": ["AGE", "age_years"]},
                "bmi": {"primary": "body_mass_index"}}"#,
        )
        .unwrap();

        assert_eq!(set.keys().collect::<Vec<_>>(), vec!["age", "bmi"]);
        assert_eq!(set.get("age").unwrap().choices(), vec!["Age", "AGE", "age_years"]);
        assert!(set.get("bmi").unwrap().alternatives.is_empty());
    }

    #[test]
    fn test_choices_drop_repeats_and_keep_primary_first() {
        let sug = Suggestion::new("sex").with_alternatives(["gender", "sex", "gender"]);
        assert_eq!(sug.choices(), vec!["sex", "gender"]);
        assert!(sug.offers("gender"));
        assert!(!sug.offers("Sex"));
    }

    #[test]
    fn test_request_wire_format() {
        let mut request = SuggestionRequest::default();
        request.data.insert(
            "Variable / Field Name".to_string(),
            Sample::new(vec![Some("age".to_string()), None]),
        );

        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"data":{"Variable / Field Name":["age",null]}}"#);
    }

    #[test]
    fn test_ensure_covers_reports_missing() {
        let mut request = SuggestionRequest::default();
        request.data.insert("age".to_string(), Sample::default());
        request.data.insert("sex".to_string(), Sample::default());

        let set: SuggestionSet = [("age", Suggestion::new("Age"))].into_iter().collect();
        let err = set.ensure_covers(&request).unwrap_err();

        assert!(err.is_service());
        assert!(err.to_string().contains("'sex'"));
    }

    #[test]
    fn test_malformed_body_is_error() {
        assert!(SuggestionSet::from_json(r#"{"age": "Age"}"#).is_err());
        assert!(SuggestionSet::from_json("not json").is_err());
    }
}
