//! CSV serialization of mapped datasets and delivery to the user.

mod exporter;
mod sink;

pub use exporter::{ExportArtifact, Exporter, DEFAULT_PREFIX};
pub use sink::{DirectorySink, DownloadSink, MemorySink};
