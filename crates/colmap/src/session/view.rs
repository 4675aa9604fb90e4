//! Serializable snapshot of a session, as shown to the user.

use serde::{Deserialize, Serialize};

use crate::decision::DecisionSummary;
use crate::input::SourceMetadata;
use crate::selection::EligibleColumn;

use super::phase::{Notice, Phase};

/// One reviewable suggestion with its current decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionView {
    /// Suggestion key.
    pub key: String,
    /// Choices offered, primary first.
    pub choices: Vec<String>,
    /// Whether the mapping will be applied.
    pub accepted: bool,
    /// Chosen replacement.
    pub selected_mapping: String,
}

/// Result of the last apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedView {
    /// Accepted mappings that were applied.
    pub applied_count: usize,
    /// Cells rewritten.
    pub cells_rewritten: usize,
    /// Name of the downloadable file.
    pub output_file: String,
}

/// Everything a front end needs to render the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    /// Current phase.
    pub phase: Phase,
    /// Step number (1-4).
    pub step: u8,
    /// Loaded file, if any.
    pub source: Option<SourceMetadata>,
    /// Header of the loaded file.
    pub field_names: Vec<String>,
    /// Columns that can be selected, with non-empty sample counts.
    pub eligible: Vec<EligibleColumn>,
    /// Selected columns in selection order.
    pub selected: Vec<String>,
    /// Suggestions under review, in response order.
    pub decisions: Vec<DecisionView>,
    /// Accepted and total decision counts.
    pub summary: DecisionSummary,
    /// Apply result, once applied.
    pub applied: Option<AppliedView>,
    /// Last notice.
    pub notice: Option<Notice>,
    /// Whether a suggestion request is outstanding.
    pub busy: bool,
}
