//! Homolog Explorer Test Utilities
//!
//! Shared test infrastructure for the workspace:
//! - Proptest generators for records and filter state
//! - A scripted fetcher standing in for HTTP and file sources
//! - Fixtures for common datasets

pub use homolog_core::{
    filter_data, homolog_filter_configs, ActiveFilters, FilterConfig, FilterValue, HomologRecord,
    QueryState, RecordId,
};
pub use homolog_query::{DataSource, FetchError, ListData, RecordFetcher, ServerQuery};

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

// ============================================================================
// MOCK FETCHER
// ============================================================================

/// In-memory fetcher. Serves a fixed dataset, answers server-mode page
/// requests by filtering and slicing it, and can be switched into failure.
#[derive(Debug)]
pub struct MockFetcher {
    records: Vec<HomologRecord>,
    configs: Vec<FilterConfig>,
    failure: Mutex<Option<String>>,
    calls: AtomicUsize,
}

impl MockFetcher {
    pub fn new(records: Vec<HomologRecord>) -> Self {
        Self {
            records,
            configs: homolog_filter_configs(),
            failure: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    /// A fetcher whose every request fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        let fetcher = Self::new(Vec::new());
        fetcher.set_failure(Some(message.into()));
        fetcher
    }

    pub fn set_failure(&self, message: Option<String>) {
        *self.failure.lock().unwrap() = message;
    }

    /// Number of fetches served so far, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn begin(&self) -> Result<(), FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.failure.lock().unwrap().as_ref() {
            Some(message) => Err(FetchError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                message.clone(),
            ))),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RecordFetcher for MockFetcher {
    async fn fetch_all(&self, _source: &DataSource) -> Result<Vec<HomologRecord>, FetchError> {
        self.begin()?;
        Ok(self.records.clone())
    }

    async fn fetch_page(
        &self,
        _source: &DataSource,
        query: &ServerQuery,
    ) -> Result<ListData, FetchError> {
        self.begin()?;
        let search = query.search.as_deref().unwrap_or("");
        let matched = filter_data(&self.records, &query.filters, &self.configs, search);
        let total_count = matched.len();
        let rows = matched
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .cloned()
            .collect();
        Ok(ListData::page(rows, total_count))
    }
}

// ============================================================================
// GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies.

    use super::*;
    use proptest::prelude::*;

    fn arb_name() -> impl Strategy<Value = Option<String>> {
        proptest::option::of("[A-Za-z][A-Za-z0-9_.]{0,11}")
    }

    /// Statistics inside the default filter ranges, sometimes absent.
    fn arb_stat(max: f64) -> impl Strategy<Value = Option<f64>> {
        proptest::option::weighted(0.9, 0.0..=max)
    }

    /// A record with the given id and arbitrary contents.
    pub fn arb_record_with_id(id: String) -> impl Strategy<Value = HomologRecord> {
        (
            (arb_name(), arb_name(), arb_name(), arb_name()),
            (arb_name(), proptest::option::of("[a-z ]{0,24}"), arb_name()),
            (
                arb_stat(500.0),
                arb_stat(500.0),
                arb_stat(500.0),
                arb_stat(1000.0),
                arb_stat(1.0),
            ),
            proptest::option::of(0u8..=1),
        )
            .prop_map(
                move |(
                    (query_transcript_name, query_locus_name, query_identifier, hit_transcript_name),
                    (hit_locus_name, hit_defline, hit_proteome),
                    (identities, coverage, positives, score, evalue),
                    is_primary,
                )| {
                    let mut record = HomologRecord::new(id.clone());
                    record.query_transcript_name = query_transcript_name;
                    record.query_locus_name = query_locus_name;
                    record.query_identifier = query_identifier;
                    record.hit_transcript_name = hit_transcript_name;
                    record.hit_locus_name = hit_locus_name;
                    record.hit_defline = hit_defline;
                    record.hit_proteome = hit_proteome;
                    record.identities = identities;
                    record.coverage = coverage;
                    record.positives = positives;
                    record.score = score;
                    record.evalue = evalue;
                    record.is_primary = is_primary;
                    record
                },
            )
    }

    pub fn arb_record() -> impl Strategy<Value = HomologRecord> {
        "[a-f0-9]{8}".prop_flat_map(arb_record_with_id)
    }

    /// Up to `max` records with unique ids.
    pub fn arb_records(max: usize) -> impl Strategy<Value = Vec<HomologRecord>> {
        (0..=max).prop_flat_map(|len| {
            (0..len)
                .map(|index| arb_record_with_id(format!("rec-{index:04}")))
                .collect::<Vec<_>>()
        })
    }

    /// An ordered range inside `[lo, hi]`.
    pub fn arb_range(lo: f64, hi: f64) -> impl Strategy<Value = FilterValue> {
        (lo..=hi, lo..=hi).prop_map(|(a, b)| FilterValue::range(a.min(b), a.max(b)))
    }

    /// Active ranges for a random subset of the default filters.
    pub fn arb_active_filters() -> impl Strategy<Value = ActiveFilters> {
        let configs = homolog_filter_configs();
        let entries: Vec<_> = configs
            .into_iter()
            .map(|config| {
                let (lo, hi) = (config.filter_props.min, config.filter_props.max);
                proptest::option::of(arb_range(lo, hi)).prop_map(move |value| {
                    value.map(|value| (config.field.clone(), value))
                })
            })
            .collect();
        entries.prop_map(|entries| entries.into_iter().flatten().collect())
    }

    pub fn arb_search_term() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::new()),
            Just("   ".to_string()),
            "[A-Za-z]{1,3}",
        ]
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built records and datasets.

    use super::*;
    use std::io::Write;

    /// A fully populated record with the given id and score.
    pub fn sample_record(id: &str, score: f64) -> HomologRecord {
        let mut record = HomologRecord::new(id);
        record.query_transcript_name = Some(format!("Potri.{id}.1"));
        record.query_locus_name = Some(format!("Potri.{id}"));
        record.query_identifier = Some(format!("Q-{id}"));
        record.hit_transcript_name = Some(format!("AT{id}.1"));
        record.hit_locus_name = Some(format!("AT{id}"));
        record.hit_identifier = Some(format!("H-{id}"));
        record.hit_defline = Some("Protein kinase superfamily protein".to_string());
        record.hit_proteome = Some("Athaliana_447".to_string());
        record.to_prot = Some(format!("AT{id}.1.p"));
        record.identities = Some(120.0);
        record.coverage = Some(95.5);
        record.positives = Some(180.0);
        record.score = Some(score);
        record.evalue = Some(1e-40);
        record.is_primary = Some(1);
        record.int_query_identifier = Some(1000);
        record.int_hit_identifier = Some(2000);
        record.insert_string = Some(String::new());
        record
    }

    /// Records `rec-0..` with the given scores, in order.
    pub fn scored_records(scores: &[f64]) -> Vec<HomologRecord> {
        scores
            .iter()
            .enumerate()
            .map(|(index, score)| sample_record(&format!("rec-{index}"), *score))
            .collect()
    }

    /// `count` records with scores `0, 10, 20, ...`.
    pub fn sample_dataset(count: usize) -> Vec<HomologRecord> {
        let scores: Vec<f64> = (0..count).map(|index| index as f64 * 10.0).collect();
        scored_records(&scores)
    }

    pub fn dataset_json(records: &[HomologRecord]) -> String {
        serde_json::to_string(records).unwrap()
    }

    /// Write `records` to a temporary JSON file that lives as long as the handle.
    pub fn write_dataset(records: &[HomologRecord]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(dataset_json(records).as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }
}
