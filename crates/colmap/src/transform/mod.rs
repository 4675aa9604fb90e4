//! Applies accepted mapping decisions to a dataset.

mod engine;
mod operations;

pub use engine::TransformEngine;
pub use operations::{RowAudit, Substitution, TransformResult};
