//! Session configuration.

use crate::export::{Exporter, DEFAULT_PREFIX};
use crate::input::{Parser, ParserConfig};
use crate::selection::{ColumnSelector, SampleWindow, DEFAULT_TARGET_FIELD};

/// Configuration for a mapping session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Only columns with this header are offered; `None` offers every column
    /// with data.
    pub target_field: Option<String>,
    /// Sample window for eligibility and requests.
    pub window: SampleWindow,
    /// Parser configuration.
    pub parser: ParserConfig,
    /// Prefix of the exported file name.
    pub export_prefix: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            target_field: Some(DEFAULT_TARGET_FIELD.to_string()),
            window: SampleWindow::default(),
            parser: ParserConfig::default(),
            export_prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

impl SessionConfig {
    /// Restrict eligible columns to a header, or lift the restriction.
    pub fn with_target_field(mut self, target_field: Option<String>) -> Self {
        self.target_field = target_field;
        self
    }

    /// Use a different sample window.
    pub fn with_window(mut self, window: SampleWindow) -> Self {
        self.window = window;
        self
    }

    /// Use a different parser configuration.
    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }

    /// Use a different export prefix.
    pub fn with_export_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.export_prefix = prefix.into();
        self
    }

    pub(crate) fn selector(&self) -> ColumnSelector {
        ColumnSelector::new(self.target_field.clone(), self.window)
    }

    pub(crate) fn build_parser(&self) -> Parser {
        Parser::with_config(self.parser.clone())
    }

    pub(crate) fn exporter(&self) -> Exporter {
        Exporter::new(self.export_prefix.clone())
    }
}
