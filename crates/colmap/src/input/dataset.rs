//! Tabular dataset model and source metadata.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Metadata about the uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name as uploaded (no directory part).
    pub file: String,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the file was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file whose contents have been parsed.
    pub fn new(file: impl Into<String>, contents: &[u8], dataset: &Dataset) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(contents);

        Self {
            file: file.into(),
            hash: format!("sha256:{:x}", hasher.finalize()),
            size_bytes: contents.len() as u64,
            row_count: dataset.row_count(),
            column_count: dataset.column_count(),
            loaded_at: Utc::now(),
        }
    }
}

/// One record: field name to cell value.
///
/// A field that is missing from the map is absent (the record was shorter
/// than the header), which is different from an empty cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(IndexMap<String, String>);

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value of a field, `None` when absent.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Set the value of a field.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    /// Number of fields present in this row.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the row has no fields at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over present fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Parsed tabular data: ordered field names plus ordered rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    field_names: Vec<String>,
    rows: Vec<Row>,
}

impl Dataset {
    /// Create a dataset from field names and rows.
    pub fn new(field_names: Vec<String>, rows: Vec<Row>) -> Self {
        Self { field_names, rows }
    }

    /// Build a dataset from string records, one value per field name.
    ///
    /// Records shorter than the header leave the trailing fields absent.
    pub fn from_records<R, S>(field_names: Vec<String>, records: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows: Vec<Row> = records
            .into_iter()
            .map(|record| {
                field_names
                    .iter()
                    .cloned()
                    .zip(record.into_iter().map(Into::<String>::into))
                    .collect::<Row>()
            })
            .collect();
        Self { field_names, rows }
    }

    /// Field names in header order.
    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    /// Data rows in file order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.field_names.len()
    }

    /// Get the number of data rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether a field name is part of the header.
    pub fn has_field(&self, name: &str) -> bool {
        self.field_names.iter().any(|f| f == name)
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, field: &str) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(field))
    }

    /// Mutable access to rows, used by the transform engine on its own copy.
    pub(crate) fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_records_leaves_short_rows_absent() {
        let ds = Dataset::from_records(
            vec!["a".to_string(), "b".to_string()],
            vec![vec!["1", "2"], vec!["3"]],
        );

        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.get(0, "b"), Some("2"));
        assert_eq!(ds.get(1, "a"), Some("3"));
        assert_eq!(ds.get(1, "b"), None);
    }

    #[test]
    fn test_source_metadata_hash() {
        let ds = Dataset::from_records(vec!["a".to_string()], vec![vec!["1"]]);
        let meta = SourceMetadata::new("data.csv", b"a\n1\n", &ds);

        assert_eq!(meta.file, "data.csv");
        assert!(meta.hash.starts_with("sha256:"));
        assert_eq!(meta.size_bytes, 4);
        assert_eq!(meta.row_count, 1);
        assert_eq!(meta.column_count, 1);
    }
}
