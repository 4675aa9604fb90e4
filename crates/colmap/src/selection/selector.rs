//! Column eligibility and the user's column selection.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::input::Dataset;

use super::sample::SampleWindow;

/// Header of the column holding free-text field names in data dictionaries.
pub const DEFAULT_TARGET_FIELD: &str = "Variable / Field Name";

/// A column the user may select, with its non-empty sample count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibleColumn {
    /// Field name.
    pub name: String,
    /// Number of non-empty values in the sample window.
    pub non_empty: usize,
}

/// Decides which columns are offered for normalization.
#[derive(Debug, Clone)]
pub struct ColumnSelector {
    target_field: Option<String>,
    window: SampleWindow,
}

impl Default for ColumnSelector {
    fn default() -> Self {
        Self::new(Some(DEFAULT_TARGET_FIELD.to_string()), SampleWindow::default())
    }
}

impl ColumnSelector {
    /// Create a selector. `target_field = None` offers every column with data.
    pub fn new(target_field: Option<String>, window: SampleWindow) -> Self {
        Self {
            target_field,
            window,
        }
    }

    /// The sample window used for eligibility.
    pub fn window(&self) -> SampleWindow {
        self.window
    }

    /// The configured target label, if any.
    pub fn target_field(&self) -> Option<&str> {
        self.target_field.as_deref()
    }

    /// Eligible columns in dataset order, with their non-empty sample counts.
    pub fn eligible(&self, dataset: &Dataset) -> Vec<EligibleColumn> {
        dataset
            .field_names()
            .iter()
            .filter(|name| self.matches_target(name))
            .filter_map(|name| {
                let sample = self.window.sample(dataset, name);
                sample.has_data().then(|| EligibleColumn {
                    name: name.clone(),
                    non_empty: sample.non_empty_count(),
                })
            })
            .collect()
    }

    /// Names of the eligible columns in dataset order.
    pub fn eligible_columns(&self, dataset: &Dataset) -> Vec<String> {
        self.eligible(dataset).into_iter().map(|c| c.name).collect()
    }

    /// Whether a single field name is eligible.
    pub fn is_eligible(&self, dataset: &Dataset, name: &str) -> bool {
        dataset.has_field(name)
            && self.matches_target(name)
            && self.window.sample(dataset, name).has_data()
    }

    fn matches_target(&self, name: &str) -> bool {
        self.target_field
            .as_deref()
            .is_none_or(|target| target == name)
    }
}

/// Ordered set of selected field names; order is selection order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectedColumns(IndexSet<String>);

impl SelectedColumns {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the field if unselected, deselect it otherwise.
    ///
    /// Returns whether the field is selected afterwards.
    pub fn toggle(&mut self, name: &str) -> bool {
        if self.0.shift_remove(name) {
            false
        } else {
            self.0.insert(name.to_string());
            true
        }
    }

    /// Whether a field is selected.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Number of selected fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Selected field names in selection order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Owned copy of the selection, used to tag outbound requests.
    pub fn snapshot(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }

    /// Whether `columns` names exactly the selected fields, in any order.
    pub fn same_fields(&self, columns: &[String]) -> bool {
        columns.len() == self.0.len() && columns.iter().all(|c| self.0.contains(c))
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Equality ignores selection order.
impl PartialEq for SelectedColumns {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && self.0.iter().all(|c| other.0.contains(c))
    }
}

impl Eq for SelectedColumns {}

impl<S: Into<String>> FromIterator<S> for SelectedColumns {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
