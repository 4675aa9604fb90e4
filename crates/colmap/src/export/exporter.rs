//! Dataset to CSV text, plus output naming.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ColmapError, Result};
use crate::input::Dataset;

use super::sink::DownloadSink;

/// Prefix added to the uploaded file name.
pub const DEFAULT_PREFIX: &str = "mapped_";

/// A serialized dataset ready for download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportArtifact {
    /// Output file name.
    pub file_name: String,
    /// CSV text.
    pub contents: String,
    /// Number of data rows written.
    pub row_count: usize,
}

/// Serializes datasets with the original header order.
#[derive(Debug, Clone)]
pub struct Exporter {
    prefix: String,
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl Exporter {
    /// Create an exporter with a custom output prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// The output prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Output name for an uploaded file.
    pub fn output_file_name(&self, original: &str) -> String {
        format!("{}{}", self.prefix, original)
    }

    /// Serialize a dataset. Absent cells are written as empty fields.
    pub fn to_csv(&self, dataset: &Dataset) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(dataset.field_names())?;

        for row in dataset.rows() {
            writer.write_record(
                dataset
                    .field_names()
                    .iter()
                    .map(|field| row.get(field).unwrap_or("")),
            )?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ColmapError::Config(format!("CSV buffer error: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| ColmapError::FileFormat(format!("Exported CSV is not UTF-8: {}", e)))
    }

    /// Build the artifact without delivering it.
    pub fn artifact(&self, dataset: &Dataset, original: &str) -> Result<ExportArtifact> {
        Ok(ExportArtifact {
            file_name: self.output_file_name(original),
            contents: self.to_csv(dataset)?,
            row_count: dataset.row_count(),
        })
    }

    /// Serialize the dataset and hand it to the sink.
    pub fn export(
        &self,
        dataset: &Dataset,
        original: &str,
        sink: &dyn DownloadSink,
    ) -> Result<ExportArtifact> {
        let artifact = self.artifact(dataset, original)?;
        sink.deliver(&artifact)?;

        info!(
            file = %artifact.file_name,
            rows = artifact.row_count,
            sink = sink.name(),
            "exported dataset"
        );
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::MemorySink;
    use crate::input::Parser;

    #[test]
    fn test_output_file_name() {
        assert_eq!(Exporter::default().output_file_name("dict.csv"), "mapped_dict.csv");
        assert_eq!(Exporter::new("norm-").output_file_name("a.csv"), "norm-a.csv");
    }

    #[test]
    fn test_to_csv_writes_absent_as_empty() {
        let ds = Dataset::from_records(
            vec!["a".to_string(), "b".to_string()],
            vec![vec!["1", "x, y"], vec!["2"]],
        );
        let csv = Exporter::default().to_csv(&ds).unwrap();
        assert_eq!(csv, "a,b\n1,\"x, y\"\n2,\n");
    }

    #[test]
    fn test_to_csv_reparses() {
        let input = b"name,label\n\"quoted \"\"value\"\"\",line\nage,Age\n";
        let ds = Parser::new().parse_bytes(input).unwrap();
        let csv = Exporter::default().to_csv(&ds).unwrap();
        let reparsed = Parser::new().parse_bytes(csv.as_bytes()).unwrap();
        assert_eq!(reparsed, ds);
    }

    #[test]
    fn test_export_delivers_to_sink() {
        let ds = Dataset::from_records(vec!["a".to_string()], vec![vec!["1"]]);
        let sink = MemorySink::new();

        let artifact = Exporter::default().export(&ds, "data.csv", &sink).unwrap();
        assert_eq!(artifact.file_name, "mapped_data.csv");
        assert_eq!(artifact.row_count, 1);
        assert_eq!(sink.artifacts(), vec![artifact]);
    }
}
