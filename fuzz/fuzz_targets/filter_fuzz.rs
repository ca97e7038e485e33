//! Fuzz test for range filter state.
//!
//! Interprets the input as a sequence of bound nudges against the default
//! filter set, then evaluates the result over a small dataset. Bounds must
//! stay ordered and inside each widget's domain, and filtering must never
//! panic.
//!
//! Run with: cargo +nightly fuzz run filter_fuzz -- -max_total_time=60

#![no_main]

use homolog_core::{filter_data, homolog_filter_configs, FilterStore, HomologRecord, RangeBound};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let configs = homolog_filter_configs();
    let mut store = FilterStore::new();

    for chunk in data.chunks(2) {
        let [op, steps] = chunk else { break };
        let config = &configs[usize::from(*op >> 1) % configs.len()];
        let bound = if op & 1 == 0 {
            RangeBound::Lower
        } else {
            RangeBound::Upper
        };
        store.nudge(config, bound, i32::from(*steps as i8));

        let (min, max) = store.get(&config.field).map(|v| v.bounds()).unwrap_or_default();
        assert!(min <= max, "{}: {} > {}", config.field, min, max);
        assert!(min >= config.filter_props.min && max <= config.filter_props.max);
    }

    let rows: Vec<HomologRecord> = (0..16)
        .map(|i| {
            let mut record = HomologRecord::new(format!("fuzz-{i}"));
            record.score = Some(f64::from(i) * 60.0);
            record.evalue = Some(f64::from(i) / 16.0);
            record
        })
        .collect();
    let kept = filter_data(&rows, store.active(), &configs, "");
    assert!(kept.len() <= rows.len());
});
