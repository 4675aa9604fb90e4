//! Transformation engine that applies mapping decisions to data.

use tracing::{debug, info, trace};

use crate::decision::DecisionStore;
use crate::input::Dataset;
use crate::selection::SelectedColumns;

use super::operations::{Substitution, TransformResult};

/// Engine for applying accepted decisions to a dataset.
///
/// The input dataset is never modified; the result carries a rewritten copy.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransformEngine;

impl TransformEngine {
    /// Create a new transform engine.
    pub fn new() -> Self {
        Self
    }

    /// Apply all accepted decisions to the selected columns of `dataset`.
    pub fn apply(
        &self,
        dataset: &Dataset,
        selected: &SelectedColumns,
        decisions: &DecisionStore,
    ) -> TransformResult {
        let substitution = Substitution::from_decisions(selected, decisions);
        self.apply_substitution(dataset, &substitution)
    }

    /// Apply a prepared substitution.
    pub fn apply_substitution(
        &self,
        dataset: &Dataset,
        substitution: &Substitution,
    ) -> TransformResult {
        debug!(operation = %substitution.description(), "applying substitution");

        let mut output = dataset.clone();
        let row_audits = substitution.apply_to(&mut output);
        for audit in &row_audits {
            trace!(
                row = audit.row,
                column = %audit.column,
                from = %audit.original_value,
                to = %audit.new_value,
                "rewrote cell"
            );
        }

        let result = TransformResult {
            dataset: output,
            applied_count: substitution.mapping.len(),
            cells_rewritten: row_audits.len(),
            row_audits,
        };
        info!(
            applied = result.applied_count,
            cells = result.cells_rewritten,
            rows = result.dataset.row_count(),
            "transform complete"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::Decision;
    use crate::selection::DEFAULT_TARGET_FIELD;

    fn dataset() -> Dataset {
        Dataset::from_records(
            vec![DEFAULT_TARGET_FIELD.to_string(), "Other".to_string()],
            vec![
                vec!["age", "age"],
                vec![" sex ", "sex"],
                vec!["bmi", "x"],
                vec!["Age", "y"],
            ],
        )
    }

    fn decisions(entries: &[(&str, bool, &str)]) -> DecisionStore {
        entries
            .iter()
            .map(|(key, accepted, mapping)| {
                (
                    *key,
                    Decision {
                        accepted: *accepted,
                        selected_mapping: mapping.to_string(),
                    },
                )
            })
            .collect()
    }

    fn selected() -> SelectedColumns {
        [DEFAULT_TARGET_FIELD].into_iter().collect()
    }

    #[test]
    fn test_apply_rewrites_selected_column_only() {
        let input = dataset();
        let store = decisions(&[("age", true, "age_years"), ("sex", true, "gender")]);

        let result = TransformEngine::new().apply(&input, &selected(), &store);

        assert_eq!(result.dataset.get(0, DEFAULT_TARGET_FIELD), Some("age_years"));
        assert_eq!(result.dataset.get(1, DEFAULT_TARGET_FIELD), Some("gender"));
        assert_eq!(result.dataset.get(0, "Other"), Some("age"));
        assert_eq!(result.dataset.get(3, DEFAULT_TARGET_FIELD), Some("Age"));
        assert_eq!(result.applied_count, 2);
        assert_eq!(result.cells_rewritten, 2);
        assert_eq!(result.row_audits[1].original_value, " sex ");

        // Input untouched.
        assert_eq!(input.get(0, DEFAULT_TARGET_FIELD), Some("age"));
    }

    #[test]
    fn test_rejected_decision_leaves_cells() {
        let store = decisions(&[("age", false, "Age"), ("bmi", true, "body_mass_index")]);
        let result = TransformEngine::new().apply(&dataset(), &selected(), &store);

        assert_eq!(result.dataset.get(0, DEFAULT_TARGET_FIELD), Some("age"));
        assert_eq!(result.dataset.get(2, DEFAULT_TARGET_FIELD), Some("body_mass_index"));
        assert_eq!(result.applied_count, 1);
    }

    #[test]
    fn test_applied_count_ignores_matches() {
        let store = decisions(&[("weight", true, "body_weight")]);
        let result = TransformEngine::new().apply(&dataset(), &selected(), &store);

        assert_eq!(result.applied_count, 1);
        assert_eq!(result.cells_rewritten, 0);
        assert_eq!(result.dataset, dataset());
    }

    #[test]
    fn test_empty_decisions_return_input() {
        let result = TransformEngine::new().apply(&dataset(), &selected(), &DecisionStore::new());
        assert_eq!(result.dataset, dataset());
        assert_eq!(result.applied_count, 0);
        assert!(result.row_audits.is_empty());
    }

    #[test]
    fn test_two_keys_in_same_row() {
        let ds = Dataset::from_records(
            vec!["a".to_string(), "b".to_string()],
            vec![vec!["gew", "ssw"]],
        );
        let sel: SelectedColumns = ["a", "b"].into_iter().collect();
        let store = decisions(&[("gew", true, "weight"), ("ssw", true, "gestational_week")]);

        let result = TransformEngine::new().apply(&ds, &sel, &store);
        assert_eq!(result.dataset.get(0, "a"), Some("weight"));
        assert_eq!(result.dataset.get(0, "b"), Some("gestational_week"));
        assert_eq!(result.dataset.field_names(), ds.field_names());
    }
}
