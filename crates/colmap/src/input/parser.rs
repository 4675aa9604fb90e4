//! CSV parser producing a [`Dataset`].

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{ColmapError, Result};
use super::dataset::{Dataset, Row, SourceMetadata};

/// UTF-8 byte order mark, skipped when present.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Field delimiter.
    pub delimiter: u8,
    /// Quote character.
    pub quote: u8,
    /// Required file-name extension (case-insensitive), `None` = accept any.
    pub required_extension: Option<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            required_extension: Some("csv".to_string()),
        }
    }
}

/// Parses uploaded CSV files.
#[derive(Debug, Clone)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Read and parse a file from disk.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(Dataset, SourceMetadata)> {
        let path = path.as_ref();
        let contents = fs::read(path).map_err(|e| ColmapError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.parse_upload(&file, &contents)
    }

    /// Parse an uploaded file given its name and raw bytes.
    pub fn parse_upload(&self, file: &str, contents: &[u8]) -> Result<(Dataset, SourceMetadata)> {
        self.check_extension(file)?;

        let dataset = self.parse_bytes(contents)?;
        let metadata = SourceMetadata::new(file, contents, &dataset);

        debug!(
            file,
            rows = metadata.row_count,
            columns = metadata.column_count,
            "parsed upload"
        );

        Ok((dataset, metadata))
    }

    /// Parse CSV bytes into a dataset.
    ///
    /// Header names are trimmed, empty lines are skipped, records shorter than
    /// the header leave the remaining fields absent and extra fields are
    /// dropped.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Dataset> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.config.delimiter)
            .quote(self.config.quote)
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let headers = reader.headers().map_err(parse_error)?;
        let field_names = dedupe_field_names(headers.iter().map(str::trim));

        if field_names.iter().all(String::is_empty) {
            return Err(empty_file());
        }

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(parse_error)?;

            let row: Row = field_names
                .iter()
                .zip(record.iter())
                .map(|(name, value)| (name.as_str(), value))
                .collect();
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(empty_file());
        }

        Ok(Dataset::new(field_names, rows))
    }

    fn check_extension(&self, file: &str) -> Result<()> {
        let Some(ext) = &self.config.required_extension else {
            return Ok(());
        };

        let matches = Path::new(file)
            .extension()
            .is_some_and(|e| e.to_string_lossy().eq_ignore_ascii_case(ext));

        if matches {
            Ok(())
        } else {
            Err(ColmapError::FileFormat(format!(
                "Please upload a valid {} file",
                ext.to_uppercase()
            )))
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

fn empty_file() -> ColmapError {
    ColmapError::FileFormat("CSV file is empty or invalid".to_string())
}

fn parse_error(e: csv::Error) -> ColmapError {
    ColmapError::FileFormat(format!("Error parsing CSV: {}", e))
}

/// Make header names unique by suffixing repeats with `_1`, `_2`, ...
fn dedupe_field_names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();

    for name in names {
        let mut candidate = name.to_string();
        let mut n = 0;
        while out.contains(&candidate) {
            n += 1;
            candidate = format!("{}_{}", name, n);
        }
        out.push(candidate);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv() {
        let parser = Parser::new();
        let data = b"name,age,city\nAlice,30,NYC\nBob,25,LA";
        let ds = parser.parse_bytes(data).unwrap();

        assert_eq!(ds.field_names(), ["name", "age", "city"]);
        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.get(0, "name"), Some("Alice"));
        assert_eq!(ds.get(1, "age"), Some("25"));
    }

    #[test]
    fn test_headers_are_trimmed() {
        let parser = Parser::new();
        let ds = parser
            .parse_bytes(b" Variable / Field Name ,Field Label\nage,Age\n")
            .unwrap();

        assert_eq!(ds.field_names()[0], "Variable / Field Name");
        assert_eq!(ds.get(0, "Variable / Field Name"), Some("age"));
    }

    #[test]
    fn test_skips_empty_lines_and_bom() {
        let parser = Parser::new();
        let ds = parser
            .parse_bytes(b"\xEF\xBB\xBFa,b\n1,2\n\n3,4\n\n")
            .unwrap();

        assert_eq!(ds.field_names(), ["a", "b"]);
        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.get(1, "a"), Some("3"));
    }

    #[test]
    fn test_short_and_long_records() {
        let parser = Parser::new();
        let ds = parser.parse_bytes(b"a,b,c\n1\n1,2,3,4\n").unwrap();

        assert_eq!(ds.get(0, "a"), Some("1"));
        assert_eq!(ds.get(0, "b"), None);
        assert_eq!(ds.rows()[1].len(), 3);
    }

    #[test]
    fn test_duplicate_headers_get_suffix() {
        let parser = Parser::new();
        let ds = parser.parse_bytes(b"x,x,x\n1,2,3\n").unwrap();

        assert_eq!(ds.field_names(), ["x", "x_1", "x_2"]);
        assert_eq!(ds.get(0, "x_2"), Some("3"));
    }

    #[test]
    fn test_header_only_is_empty() {
        let parser = Parser::new();
        let err = parser.parse_bytes(b"a,b\n").unwrap_err();
        assert!(matches!(err, ColmapError::FileFormat(_)));

        let err = parser.parse_bytes(b"").unwrap_err();
        assert!(matches!(err, ColmapError::FileFormat(_)));
    }

    #[test]
    fn test_rejects_non_csv_name() {
        let parser = Parser::new();
        let err = parser.parse_upload("notes.txt", b"a\n1\n").unwrap_err();
        assert_eq!(err.to_string(), "Please upload a valid CSV file");

        assert!(parser.parse_upload("DATA.CSV", b"a\n1\n").is_ok());
    }

    #[test]
    fn test_invalid_utf8_is_file_format_error() {
        let parser = Parser::new();
        let err = parser.parse_bytes(b"a,b\n\xff\xfe,1\n").unwrap_err();
        assert!(matches!(err, ColmapError::FileFormat(_)));
    }
}
