//! Session phases, notices, and request tickets.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where the session is in the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No file loaded.
    AwaitingFile,
    /// File loaded; the user picks columns and submits.
    SelectingColumns,
    /// Suggestions received; the user accepts, rejects, or overrides them.
    ReviewingSuggestions,
    /// Decisions applied; the mapped file can be downloaded.
    Applied,
}

impl Phase {
    /// Step number shown to the user (1-based).
    pub fn step(&self) -> u8 {
        match self {
            Phase::AwaitingFile => 1,
            Phase::SelectingColumns => 2,
            Phase::ReviewingSuggestions => 3,
            Phase::Applied => 4,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::AwaitingFile => "awaiting a file",
            Phase::SelectingColumns => "selecting columns",
            Phase::ReviewingSuggestions => "reviewing suggestions",
            Phase::Applied => "showing applied mappings",
        };
        write!(f, "{}", s)
    }
}

/// Message shown to the user after an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum Notice {
    /// The last action failed.
    Error(String),
    /// The last action succeeded with something worth reporting.
    Success(String),
}

impl Notice {
    /// The message text.
    pub fn message(&self) -> &str {
        match self {
            Notice::Error(m) | Notice::Success(m) => m,
        }
    }

    /// Whether this is an error notice.
    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

/// Handle of an outstanding suggestion request.
///
/// A response is only accepted while its ticket is the pending one and the
/// selection still equals the snapshot taken when the request was built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionTicket {
    /// Monotonic request id within the session.
    pub id: u64,
    /// Selected columns when the request was built.
    pub columns: Vec<String>,
}
