//! Column eligibility, selection, and sampling.

mod sample;
mod selector;

pub use sample::{Sample, SampleWindow};
pub use selector::{ColumnSelector, EligibleColumn, SelectedColumns, DEFAULT_TARGET_FIELD};
