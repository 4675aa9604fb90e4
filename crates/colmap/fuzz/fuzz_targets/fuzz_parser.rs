//! Fuzz target for the upload parser.
//!
//! The parser must never panic on malformed input, and anything it accepts
//! must survive an export and re-parse.

#![no_main]

use colmap::{Exporter, Parser};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    let parser = Parser::new();
    if let Ok((dataset, _)) = parser.parse_upload("fuzz.csv", data) {
        if let Ok(csv) = Exporter::default().to_csv(&dataset) {
            let _ = parser.parse_bytes(csv.as_bytes());
        }
    }
});
