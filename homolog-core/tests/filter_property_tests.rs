//! Property-Based Tests for Filter Evaluation and Pagination
//!
//! **Property 1: Inclusive range semantics**
//! A row survives a `between-inclusive` filter iff its value lies in
//! `[min, max]`, boundaries included. Absent values fail closed.
//!
//! **Property 2: Purity**
//! Output is an order-preserving subsequence of the input; empty filters and
//! an empty search term keep every row.
//!
//! **Property 3: Commutativity**
//! Applying filters then search yields the same rows as search then filters.
//!
//! **Property 4: Offset arithmetic**
//! `offset == page * page_size` after every pagination change, and a
//! page-size change returns to the first page.

use homolog_core::{
    filter_data, homolog_filter_configs, matches_filters, matches_search, ActiveFilters,
    FilterStore, FilterValue, HomologRecord, PaginationModel, QueryState, RangeBound,
    PAGE_SIZE_OPTIONS,
};
use homolog_test_utils::fixtures::scored_records;
use homolog_test_utils::generators::{arb_active_filters, arb_records, arb_search_term};
use proptest::prelude::*;

fn ids(rows: &[&HomologRecord]) -> Vec<String> {
    rows.iter().map(|row| row.id.to_string()).collect()
}

// ============================================================================
// EXAMPLES
// ============================================================================

#[test]
fn test_score_range_keeps_only_in_range_row() {
    let rows = scored_records(&[10.0, 250.0, 999.0]);
    let mut active = ActiveFilters::new();
    active.insert("score", FilterValue::range(100.0, 500.0));

    let kept = filter_data(&rows, &active, &homolog_filter_configs(), "");

    assert_eq!(ids(&kept), vec!["rec-1"]);
}

#[test]
fn test_boundary_values_are_kept() {
    let rows = scored_records(&[100.0, 500.0, 99.999, 500.001]);
    let mut active = ActiveFilters::new();
    active.insert("score", FilterValue::range(100.0, 500.0));

    let kept = filter_data(&rows, &active, &homolog_filter_configs(), "");

    assert_eq!(ids(&kept), vec!["rec-0", "rec-1"]);
}

#[test]
fn test_missing_value_fails_closed() {
    let mut rows = scored_records(&[50.0]);
    rows.push(HomologRecord::new("bare"));
    let mut active = ActiveFilters::new();
    active.insert("score", FilterValue::range(0.0, 1000.0));

    let kept = filter_data(&rows, &active, &homolog_filter_configs(), "");

    assert_eq!(ids(&kept), vec!["rec-0"]);
}

#[test]
fn test_unconfigured_active_entry_is_ignored() {
    let rows = scored_records(&[1.0, 2.0]);
    let mut active = ActiveFilters::new();
    active.insert("notAField", FilterValue::range(100.0, 200.0));

    let kept = filter_data(&rows, &active, &homolog_filter_configs(), "");

    assert_eq!(kept.len(), 2);
}

#[test]
fn test_empty_dataset_is_empty_not_error() {
    let mut active = ActiveFilters::new();
    active.insert("score", FilterValue::range(0.0, 10.0));
    assert!(filter_data(&[], &active, &homolog_filter_configs(), "kinase").is_empty());
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// **Property 1: Inclusive range semantics**
    #[test]
    fn prop_kept_rows_satisfy_every_range(
        rows in arb_records(40),
        active in arb_active_filters(),
    ) {
        let configs = homolog_filter_configs();
        let kept = filter_data(&rows, &active, &configs, "");

        for row in &rows {
            let expected = configs.iter().all(|config| match active.get(&config.field) {
                None => true,
                Some(value) => {
                    let (min, max) = value.bounds();
                    row.numeric(&config.field).is_some_and(|v| min <= v && v <= max)
                }
            });
            let was_kept = kept.iter().any(|k| k.id == row.id);
            prop_assert_eq!(expected, was_kept, "row {}", row.id);
        }
    }

    /// **Property 2: Purity**
    #[test]
    fn prop_output_is_ordered_subsequence(
        rows in arb_records(40),
        active in arb_active_filters(),
        search in arb_search_term(),
    ) {
        let before = rows.clone();
        let kept = filter_data(&rows, &active, &homolog_filter_configs(), &search);

        prop_assert_eq!(&rows, &before);
        let positions: Vec<usize> = kept
            .iter()
            .map(|k| rows.iter().position(|r| r.id == k.id).unwrap())
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    /// **Property 2: Purity (identity)**
    #[test]
    fn prop_no_filters_no_search_is_identity(rows in arb_records(40)) {
        let kept = filter_data(&rows, &ActiveFilters::new(), &homolog_filter_configs(), "  ");
        prop_assert_eq!(kept.len(), rows.len());
    }

    /// **Property 3: Commutativity**
    #[test]
    fn prop_filter_and_search_commute(
        rows in arb_records(40),
        active in arb_active_filters(),
        search in arb_search_term(),
    ) {
        let configs = homolog_filter_configs();
        let filter_first: Vec<&HomologRecord> = rows
            .iter()
            .filter(|r| matches_filters(r, &active, &configs))
            .filter(|r| matches_search(r, &search))
            .collect();
        let search_first: Vec<&HomologRecord> = rows
            .iter()
            .filter(|r| matches_search(r, &search))
            .filter(|r| matches_filters(r, &active, &configs))
            .collect();
        let combined = filter_data(&rows, &active, &configs, &search);

        prop_assert_eq!(ids(&filter_first), ids(&search_first));
        prop_assert_eq!(ids(&filter_first), ids(&combined));
    }

    /// **Property 4: Offset arithmetic**
    #[test]
    fn prop_offset_tracks_page_and_size(
        changes in prop::collection::vec(
            (0usize..50, prop::sample::select(PAGE_SIZE_OPTIONS.to_vec())),
            1..20,
        ),
    ) {
        let mut state = QueryState::default();
        for (page, page_size) in changes {
            let previous_size = state.page_size();
            state.apply(PaginationModel { page, page_size });

            prop_assert_eq!(state.offset(), state.page() * state.page_size());
            if page_size != previous_size {
                prop_assert_eq!(state.page(), 0);
            } else {
                prop_assert_eq!(state.page(), page);
            }
        }
    }

    /// **Property 4b: Offset arithmetic holds for any page index**
    #[test]
    fn prop_offset_exact_for_any_page(
        page in any::<usize>(),
        page_size in prop::sample::select(PAGE_SIZE_OPTIONS.to_vec()),
    ) {
        let mut state = QueryState::new(page_size);
        state.apply(PaginationModel { page, page_size });

        prop_assert_eq!(state.page_size().checked_mul(state.page()), Some(state.offset()));
        prop_assert!(state.page() <= page);
    }

    /// Nudged bounds stay inside the widget range and never cross.
    #[test]
    fn prop_nudge_keeps_range_ordered(
        moves in prop::collection::vec((any::<bool>(), -20i32..20), 1..30),
        index in 0usize..6,
    ) {
        let configs = homolog_filter_configs();
        let config = &configs[index];
        let mut store = FilterStore::new();
        for (lower, steps) in moves {
            let bound = if lower { RangeBound::Lower } else { RangeBound::Upper };
            store.nudge(config, bound, steps);

            let (min, max) = store.get(&config.field).unwrap().bounds();
            prop_assert!(min <= max);
            prop_assert!(min >= config.filter_props.min);
            prop_assert!(max <= config.filter_props.max);
        }
    }
}
