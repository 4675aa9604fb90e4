//! Substitution operation and its result.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::decision::DecisionStore;
use crate::input::Dataset;
use crate::selection::SelectedColumns;

/// Value substitution over a set of columns.
///
/// A cell is rewritten when its trimmed value is a key of `mapping`.
/// Comparison is exact; there is no case folding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
    /// Columns to rewrite, in selection order.
    pub columns: Vec<String>,

    /// Original value to replacement.
    pub mapping: IndexMap<String, String>,
}

impl Substitution {
    /// Build the substitution for the selected columns and accepted decisions.
    pub fn from_decisions(selected: &SelectedColumns, decisions: &DecisionStore) -> Self {
        Self {
            columns: selected.snapshot(),
            mapping: decisions.accepted_mappings(),
        }
    }

    /// Replacement for a raw cell value, if any.
    ///
    /// Empty cells and empty replacements never match.
    pub fn replacement(&self, value: &str) -> Option<&str> {
        let key = value.trim();
        if key.is_empty() {
            return None;
        }
        self.mapping
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Whether applying this would leave every dataset unchanged.
    pub fn is_noop(&self) -> bool {
        self.columns.is_empty() || self.mapping.is_empty()
    }

    /// Get a human-readable description of the operation.
    pub fn description(&self) -> String {
        let examples: Vec<String> = self
            .mapping
            .iter()
            .take(3)
            .map(|(from, to)| format!("'{}' → '{}'", from, to))
            .collect();
        format!(
            "Map {} value(s) in {}: {}",
            self.mapping.len(),
            self.columns.join(", "),
            examples.join(", ")
        )
    }

    /// Rewrite matching cells in place, returning one audit per changed cell.
    pub(crate) fn apply_to(&self, dataset: &mut Dataset) -> Vec<RowAudit> {
        let mut audits = Vec::new();
        if self.is_noop() {
            return audits;
        }

        for (idx, row) in dataset.rows_mut().iter_mut().enumerate() {
            for column in &self.columns {
                let Some(original) = row.get(column) else {
                    continue;
                };
                let Some(new_value) = self.replacement(original) else {
                    continue;
                };
                let audit = RowAudit {
                    row: idx,
                    column: column.clone(),
                    original_value: original.to_string(),
                    new_value: new_value.to_string(),
                };
                row.set(column.clone(), new_value);
                audits.push(audit);
            }
        }
        audits
    }
}

/// Result of applying decisions to a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformResult {
    /// The rewritten dataset.
    pub dataset: Dataset,

    /// Number of accepted mappings that were applied.
    pub applied_count: usize,

    /// Number of cells actually rewritten.
    pub cells_rewritten: usize,

    /// Per-cell audit information.
    pub row_audits: Vec<RowAudit>,
}

/// Audit information for a single cell change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowAudit {
    /// Row index (0-based, data rows only).
    pub row: usize,

    /// Column that was changed.
    pub column: String,

    /// Original value before transformation.
    pub original_value: String,

    /// New value after transformation.
    pub new_value: String,
}
