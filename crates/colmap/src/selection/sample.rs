//! Fixed sample windows over a column.

use serde::{Deserialize, Serialize};

use crate::input::Dataset;

/// Window of data rows a sample is taken from.
///
/// The default skips the first data row and takes the next six, i.e. data
/// rows 2 through 7 (1-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleWindow {
    /// Number of leading data rows to skip.
    pub skip: usize,
    /// Maximum number of values in a sample.
    pub size: usize,
}

impl Default for SampleWindow {
    fn default() -> Self {
        Self { skip: 1, size: 6 }
    }
}

impl SampleWindow {
    /// Create a window.
    pub fn new(skip: usize, size: usize) -> Self {
        Self { skip, size }
    }

    /// Take the sample for a field.
    ///
    /// Rows where the field is absent contribute `None`. Datasets with fewer
    /// rows than the window yield a shorter sample.
    pub fn sample(&self, dataset: &Dataset, field: &str) -> Sample {
        Sample(
            dataset
                .rows()
                .iter()
                .skip(self.skip)
                .take(self.size)
                .map(|row| row.get(field).map(str::to_string))
                .collect(),
        )
    }
}

/// Ordered sampled values of one column, `None` for absent cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sample(Vec<Option<String>>);

impl Sample {
    /// Create a sample from values.
    pub fn new(values: Vec<Option<String>>) -> Self {
        Self(values)
    }

    /// The sampled values.
    pub fn values(&self) -> &[Option<String>] {
        &self.0
    }

    /// Number of sampled positions, including empty and absent ones.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no rows fell inside the window.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of values that are present and not the empty string.
    pub fn non_empty_count(&self) -> usize {
        self.present().count()
    }

    /// Whether at least one value is present and not the empty string.
    pub fn has_data(&self) -> bool {
        self.present().next().is_some()
    }

    /// Present, non-empty values in order.
    pub fn present(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter_map(|v| v.as_deref())
            .filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(values: &[&str]) -> Dataset {
        Dataset::from_records(
            vec!["field".to_string()],
            values.iter().map(|v| vec![*v]),
        )
    }

    #[test]
    fn test_window_skips_first_row() {
        let ds = dataset(&["r1", "r2", "r3", "r4", "r5", "r6", "r7", "r8"]);
        let sample = SampleWindow::default().sample(&ds, "field");

        let values: Vec<_> = sample.values().iter().map(|v| v.as_deref()).collect();
        assert_eq!(
            values,
            vec![Some("r2"), Some("r3"), Some("r4"), Some("r5"), Some("r6"), Some("r7")]
        );
    }

    #[test]
    fn test_short_dataset_gives_short_sample() {
        let ds = dataset(&["r1", "r2", "r3"]);
        let sample = SampleWindow::default().sample(&ds, "field");
        assert_eq!(sample.len(), 2);

        let ds = dataset(&["only"]);
        assert!(SampleWindow::default().sample(&ds, "field").is_empty());
    }

    #[test]
    fn test_unknown_field_is_absent() {
        let ds = dataset(&["r1", "r2"]);
        let sample = SampleWindow::default().sample(&ds, "missing");

        assert_eq!(sample.values(), &[None::<String>]);
        assert!(!sample.has_data());
    }

    #[test]
    fn test_non_empty_count() {
        let sample = Sample::new(vec![
            Some(String::new()),
            None,
            Some("age".to_string()),
            Some(" ".to_string()),
        ]);

        assert_eq!(sample.non_empty_count(), 2);
        assert!(sample.has_data());
        assert!(!Sample::new(vec![None, Some(String::new())]).has_data());
    }

    #[test]
    fn test_serializes_absent_as_null() {
        let sample = Sample::new(vec![Some("a".to_string()), None, Some(String::new())]);
        let json = serde_json::to_string(&sample).unwrap();
        assert_eq!(json, r#"["a",null,""]"#);
    }
}
