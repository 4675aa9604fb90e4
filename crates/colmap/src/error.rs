//! Error types for the colmap library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for colmap operations.
#[derive(Debug, Error)]
pub enum ColmapError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The uploaded file is not a CSV file, cannot be decoded, or has no rows.
    #[error("{0}")]
    FileFormat(String),

    /// Submit was requested with no column selected.
    #[error("Please select at least one column")]
    EmptySelection,

    /// The suggestion service could not be reached or answered badly.
    #[error("Failed to submit data: {0}")]
    Service(String),

    /// A key, column, or candidate is not one the session knows about.
    #[error("Invalid selection: {0}")]
    Validation(String),

    /// The action is not allowed in the current phase.
    #[error("Cannot {action} while {phase}")]
    InvalidPhase { action: &'static str, phase: String },

    /// A suggestion request for the current selection is already in flight.
    #[error("Suggestions are already being requested")]
    Busy,

    /// A response arrived for a request the user has since superseded.
    #[error("Discarded suggestions for an outdated column selection")]
    StaleResponse,

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ColmapError {
    /// Whether the error came from the suggestion service boundary.
    pub fn is_service(&self) -> bool {
        matches!(self, ColmapError::Service(_))
    }
}

/// Result type alias for colmap operations.
pub type Result<T> = std::result::Result<T, ColmapError>;
