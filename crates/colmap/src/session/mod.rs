//! The mapping session: one upload taken from selection to download.
//!
//! [`MappingSession`] owns the dataset, selection, suggestions, decisions,
//! and transform result, and moves between [`Phase`]s through explicit
//! actions. Failed actions leave state unchanged and record a [`Notice`].

mod config;
mod controller;
mod phase;
mod view;

pub use config::SessionConfig;
pub use controller::MappingSession;
pub use phase::{Notice, Phase, SuggestionTicket};
pub use view::{AppliedView, DecisionView, SessionView};
