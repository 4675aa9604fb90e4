//! Review decisions on suggestions.

mod decision;
mod store;

pub use decision::Decision;
pub use store::{DecisionStore, DecisionSummary};
