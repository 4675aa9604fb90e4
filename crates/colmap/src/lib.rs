//! colmap: suggestion-driven value mapping for CSV columns.
//!
//! Upload a CSV file, pick the columns holding free-text field names, ask a
//! suggestion service for normalized names, review each suggestion, and
//! write the file back out with the accepted names substituted in place.
//!
//! # Core Principles
//!
//! - **Reviewed**: nothing is rewritten until the user applies decisions
//! - **Non-destructive**: the loaded dataset is never modified
//! - **Deterministic**: the same decisions always produce the same output
//!
//! # Example
//!
//! ```no_run
//! use colmap::{HttpSuggestionClient, MappingSession, MemorySink, DEFAULT_ENDPOINT};
//!
//! let client = HttpSuggestionClient::new(DEFAULT_ENDPOINT).unwrap();
//! let mut session = MappingSession::new();
//! session.load_path("dictionary.csv").unwrap();
//! session.toggle_column("Variable / Field Name").unwrap();
//! session.submit(&client).unwrap();
//! session.apply().unwrap();
//!
//! let artifact = session.export(&MemorySink::new()).unwrap();
//! println!("{}", artifact.file_name);
//! ```

pub mod decision;
pub mod error;
pub mod export;
pub mod input;
pub mod selection;
pub mod session;
pub mod suggestion;
pub mod transform;

pub use decision::{Decision, DecisionStore, DecisionSummary};
pub use error::{ColmapError, Result};
pub use export::{DirectorySink, DownloadSink, ExportArtifact, Exporter, MemorySink};
pub use input::{Dataset, Parser, ParserConfig, Row, SourceMetadata};
pub use selection::{
    ColumnSelector, EligibleColumn, Sample, SampleWindow, SelectedColumns, DEFAULT_TARGET_FIELD,
};
pub use session::{MappingSession, Notice, Phase, SessionConfig, SessionView, SuggestionTicket};
pub use suggestion::{
    ChatConfig, ChatSuggestionClient, HttpSuggestionClient, MockSuggestionClient, Suggestion,
    SuggestionClient, SuggestionRequest, SuggestionSet, DEFAULT_ENDPOINT,
};
pub use transform::{TransformEngine, TransformResult};
