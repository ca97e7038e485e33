//! Fuzz test for dataset loading.
//!
//! Feeds arbitrary bytes to `parse_records`. Loading must never panic, and
//! every element of an accepted array is either a record or a rejection.
//!
//! Run with: cargo +nightly fuzz run records_fuzz -- -max_total_time=60

#![no_main]

use homolog_core::parse_records;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok((records, report)) = parse_records(data) else {
        return;
    };

    let len = serde_json::from_slice::<serde_json::Value>(data)
        .ok()
        .and_then(|value| value.as_array().map(Vec::len))
        .expect("accepted input must be a JSON array");

    assert_eq!(records.len(), report.accepted);
    assert_eq!(report.accepted + report.rejected_count(), len);
    for record in &records {
        assert!(!record.id.as_str().is_empty(), "accepted records carry an id");
    }
});
