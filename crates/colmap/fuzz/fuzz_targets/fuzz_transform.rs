//! Fuzz target for the transform engine.
//!
//! Arbitrary decisions applied to an arbitrary dataset must keep the header
//! and row count intact.

#![no_main]

use arbitrary::Arbitrary;
use colmap::{Dataset, Decision, DecisionStore, SelectedColumns, TransformEngine};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    rows: Vec<Vec<String>>,
    decisions: Vec<(String, bool, String)>,
    select_mask: u8,
}

fuzz_target!(|input: Input| {
    if input.rows.len() > 1_000 {
        return;
    }

    let names: Vec<String> = (0..8).map(|i| format!("c{}", i)).collect();
    let dataset = Dataset::from_records(names.clone(), input.rows);

    let selected: SelectedColumns = names
        .iter()
        .enumerate()
        .filter(|(i, _)| input.select_mask & (1 << i) != 0)
        .map(|(_, n)| n.clone())
        .collect();

    let store: DecisionStore = input
        .decisions
        .into_iter()
        .map(|(key, accepted, selected_mapping)| {
            (
                key,
                Decision {
                    accepted,
                    selected_mapping,
                },
            )
        })
        .collect();

    let result = TransformEngine::new().apply(&dataset, &selected, &store);
    assert_eq!(result.dataset.field_names(), dataset.field_names());
    assert_eq!(result.dataset.row_count(), dataset.row_count());
});
