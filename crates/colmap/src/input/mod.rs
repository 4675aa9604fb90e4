//! Input parsing and the tabular data model.

mod dataset;
mod parser;

pub use dataset::{Dataset, Row, SourceMetadata};
pub use parser::{Parser, ParserConfig};
