//! Filter predicate evaluation.
//!
//! [`filter_data`] narrows a record set by the active filter values and a
//! free-text search term. Evaluation is pure: inputs are borrowed, the
//! output borrows from the input rows, and input order is preserved.

use crate::config::{FilterConfig, FilterOperator};
use crate::error::ValidationError;
use crate::record::{HomologRecord, RecordField};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fields consulted by free-text search.
pub const SEARCHABLE_FIELDS: [RecordField; 8] = [
    RecordField::QueryTranscriptName,
    RecordField::QueryLocusName,
    RecordField::QueryIdentifier,
    RecordField::HitTranscriptName,
    RecordField::HitLocusName,
    RecordField::HitIdentifier,
    RecordField::HitDefline,
    RecordField::HitProteome,
];

/// The value a filter widget produced for one field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Range { min: f64, max: f64 },
}

impl FilterValue {
    pub fn range(min: f64, max: f64) -> Self {
        FilterValue::Range { min, max }
    }

    pub fn bounds(&self) -> (f64, f64) {
        match self {
            FilterValue::Range { min, max } => (*min, *max),
        }
    }
}

impl FilterOperator {
    /// Apply this operator. An absent record value never matches.
    pub fn evaluate(&self, value: Option<f64>, filter: &FilterValue) -> bool {
        let Some(value) = value else {
            return false;
        };
        match (self, filter) {
            (FilterOperator::BetweenInclusive, FilterValue::Range { min, max }) => {
                *min <= value && value <= *max
            }
        }
    }
}

/// Field name → chosen filter value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActiveFilters(BTreeMap<String, FilterValue>);

impl ActiveFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&FilterValue> {
        self.0.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: FilterValue) -> Option<FilterValue> {
        self.0.insert(field.into(), value)
    }

    pub fn remove(&mut self, field: &str) -> Option<FilterValue> {
        self.0.remove(field)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.0.iter().map(|(field, value)| (field.as_str(), value))
    }
}

impl FromIterator<(String, FilterValue)> for ActiveFilters {
    fn from_iter<I: IntoIterator<Item = (String, FilterValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Which end of a range a widget is moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    Lower,
    Upper,
}

/// Page-scoped owner of the active filters.
///
/// Filter widgets write through the methods here; the query layer and the
/// evaluator read [`FilterStore::active`]. Every mutation bumps
/// [`FilterStore::revision`].
#[derive(Debug, Clone, Default)]
pub struct FilterStore {
    active: ActiveFilters,
    revision: u64,
}

impl FilterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> &ActiveFilters {
        &self.active
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get(&self, field: &str) -> Option<&FilterValue> {
        self.active.get(field)
    }

    /// Set a range for the configured field.
    pub fn set_range(
        &mut self,
        config: &FilterConfig,
        min: f64,
        max: f64,
    ) -> Result<(), ValidationError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(ValidationError::InvalidValue {
                field: config.field.clone(),
                reason: "range bounds must be finite".to_string(),
            });
        }
        if min > max {
            return Err(ValidationError::InvalidValue {
                field: config.field.clone(),
                reason: format!("min {} exceeds max {}", min, max),
            });
        }
        self.active
            .insert(config.field.clone(), FilterValue::range(min, max));
        self.revision += 1;
        Ok(())
    }

    /// Move one bound of a field's range by `steps` widget steps.
    ///
    /// A field with no active value starts from the widget's full range.
    /// Bounds stay inside the widget range and never cross.
    pub fn nudge(&mut self, config: &FilterConfig, bound: RangeBound, steps: i32) {
        let props = config.filter_props;
        let step = config.effective_step();
        if config.validate().is_err() {
            return;
        }
        let (mut min, mut max) = self
            .active
            .get(&config.field)
            .map(FilterValue::bounds)
            .unwrap_or((props.min, props.max));
        min = min.clamp(props.min, props.max);
        max = max.clamp(min, props.max);

        let snap = |value: f64| props.min + ((value - props.min) / step).round() * step;
        match bound {
            RangeBound::Lower => {
                min = snap(min + step * f64::from(steps)).clamp(props.min, max);
            }
            RangeBound::Upper => {
                max = snap(max + step * f64::from(steps)).clamp(min, props.max);
            }
        }
        self.active
            .insert(config.field.clone(), FilterValue::range(min, max));
        self.revision += 1;
    }

    /// Drop the value for one field. Returns whether anything was removed.
    pub fn clear_field(&mut self, field: &str) -> bool {
        let removed = self.active.remove(field).is_some();
        if removed {
            self.revision += 1;
        }
        removed
    }

    /// Remove every active value.
    pub fn reset(&mut self) {
        if !self.active.is_empty() {
            self.active.clear();
            self.revision += 1;
        }
    }
}

/// A lowercased, trimmed search term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, record: &HomologRecord) -> bool {
        if self.is_empty() {
            return true;
        }
        SEARCHABLE_FIELDS.iter().any(|field| {
            record
                .text_field(*field)
                .is_some_and(|text| text.to_lowercase().contains(&self.0))
        })
    }
}

/// Whether a record satisfies every configured filter that has an active value.
pub fn matches_filters(
    record: &HomologRecord,
    active: &ActiveFilters,
    configs: &[FilterConfig],
) -> bool {
    configs.iter().all(|config| match active.get(&config.field) {
        None => true,
        Some(value) => config
            .operator
            .evaluate(record.numeric(&config.field), value),
    })
}

/// Case-insensitive substring match over [`SEARCHABLE_FIELDS`].
pub fn matches_search(record: &HomologRecord, search_term: &str) -> bool {
    SearchTerm::new(search_term).matches(record)
}

/// Rows that pass both the active filters and the search term.
pub fn filter_data<'a>(
    rows: &'a [HomologRecord],
    active: &ActiveFilters,
    configs: &[FilterConfig],
    search_term: &str,
) -> Vec<&'a HomologRecord> {
    let search = SearchTerm::new(search_term);
    rows.iter()
        .filter(|record| matches_filters(record, active, configs) && search.matches(record))
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::homolog_filter_configs;

    fn scored(id: &str, score: f64) -> HomologRecord {
        let mut record = HomologRecord::new(id);
        record.score = Some(score);
        record
    }

    fn score_filter(min: f64, max: f64) -> ActiveFilters {
        let mut active = ActiveFilters::new();
        active.insert("score", FilterValue::range(min, max));
        active
    }

    // ========================================================================
    // Range evaluation
    // ========================================================================

    #[test]
    fn test_between_inclusive_keeps_bounds() {
        let op = FilterOperator::BetweenInclusive;
        let range = FilterValue::range(10.0, 20.0);
        assert!(op.evaluate(Some(10.0), &range));
        assert!(op.evaluate(Some(20.0), &range));
        assert!(!op.evaluate(Some(9.999), &range));
        assert!(!op.evaluate(Some(20.001), &range));
    }

    #[test]
    fn test_absent_and_nan_fail_closed() {
        let op = FilterOperator::BetweenInclusive;
        let range = FilterValue::range(0.0, 1.0);
        assert!(!op.evaluate(None, &range));
        assert!(!op.evaluate(Some(f64::NAN), &range));
    }

    #[test]
    fn test_score_scenario_keeps_two_of_three() {
        let rows = vec![scored("a", 10.0), scored("b", 250.0), scored("c", 999.0)];
        let kept = filter_data(&rows, &score_filter(0.0, 500.0), &homolog_filter_configs(), "");
        let scores: Vec<f64> = kept.iter().filter_map(|r| r.score).collect();
        assert_eq!(scores, vec![10.0, 250.0]);
    }

    #[test]
    fn test_missing_field_is_excluded_only_when_filtered() {
        let rows = vec![HomologRecord::new("bare"), scored("s", 5.0)];
        let configs = homolog_filter_configs();

        let unfiltered = filter_data(&rows, &ActiveFilters::new(), &configs, "");
        assert_eq!(unfiltered.len(), 2);

        let filtered = filter_data(&rows, &score_filter(0.0, 10.0), &configs, "");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id.as_str(), "s");
    }

    #[test]
    fn test_active_value_without_config_is_ignored() {
        let rows = vec![scored("a", 10.0)];
        let mut active = ActiveFilters::new();
        active.insert("coverage", FilterValue::range(50.0, 60.0));
        let configs = vec![FilterConfig::range_slider("score", "Score", 0.0, 1000.0)];
        assert_eq!(filter_data(&rows, &active, &configs, "").len(), 1);
    }

    #[test]
    fn test_empty_dataset_yields_empty() {
        let rows: Vec<HomologRecord> = Vec::new();
        assert!(filter_data(&rows, &score_filter(0.0, 1.0), &homolog_filter_configs(), "x")
            .is_empty());
    }

    // ========================================================================
    // Search
    // ========================================================================

    #[test]
    fn test_search_is_case_insensitive() {
        let mut record = HomologRecord::new("a");
        record.hit_defline = Some("Kinase Domain".to_string());
        assert!(matches_search(&record, "kinase"));
        assert!(matches_search(&record, "DOMAIN"));
        assert!(!matches_search(&record, "phosphatase"));
    }

    #[test]
    fn test_blank_search_keeps_everything() {
        let record = HomologRecord::new("a");
        assert!(matches_search(&record, ""));
        assert!(matches_search(&record, "   "));
    }

    #[test]
    fn test_search_does_not_consult_id() {
        let record = HomologRecord::new("needle");
        assert!(!matches_search(&record, "needle"));
    }

    #[test]
    fn test_search_and_filters_are_anded() {
        let mut hit = scored("a", 100.0);
        hit.query_locus_name = Some("Potri.001G".to_string());
        let mut miss = scored("b", 900.0);
        miss.query_locus_name = Some("Potri.002G".to_string());
        let rows = vec![hit, miss];

        let kept = filter_data(&rows, &score_filter(0.0, 500.0), &homolog_filter_configs(), "potri");
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id.as_str(), "a");
    }

    // ========================================================================
    // FilterStore
    // ========================================================================

    #[test]
    fn test_store_set_and_reset_bump_revision() {
        let configs = homolog_filter_configs();
        let mut store = FilterStore::new();
        assert_eq!(store.revision(), 0);

        store.set_range(&configs[3], 0.0, 500.0).unwrap();
        assert_eq!(store.revision(), 1);
        assert_eq!(store.get("score"), Some(&FilterValue::range(0.0, 500.0)));

        store.reset();
        assert!(store.active().is_empty());
        assert_eq!(store.revision(), 2);

        store.reset();
        assert_eq!(store.revision(), 2);
    }

    #[test]
    fn test_store_rejects_inverted_range() {
        let configs = homolog_filter_configs();
        let mut store = FilterStore::new();
        assert!(store.set_range(&configs[0], 5.0, 1.0).is_err());
        assert!(store.active().is_empty());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_store_clear_field() {
        let configs = homolog_filter_configs();
        let mut store = FilterStore::new();
        store.set_range(&configs[0], 1.0, 2.0).unwrap();
        assert!(store.clear_field("identities"));
        assert!(!store.clear_field("identities"));
        assert!(store.active().is_empty());
    }

    #[test]
    fn test_nudge_starts_from_full_range_and_clamps() {
        let score = FilterConfig::range_slider("score", "Score", 0.0, 1000.0);
        let mut store = FilterStore::new();

        store.nudge(&score, RangeBound::Lower, 3);
        assert_eq!(store.get("score"), Some(&FilterValue::range(30.0, 1000.0)));

        store.nudge(&score, RangeBound::Upper, 5);
        assert_eq!(store.get("score"), Some(&FilterValue::range(30.0, 1000.0)));

        store.nudge(&score, RangeBound::Lower, -10);
        assert_eq!(store.get("score"), Some(&FilterValue::range(0.0, 1000.0)));
    }

    #[test]
    fn test_nudge_never_crosses_bounds() {
        let flag = FilterConfig::range_slider("isPrimary", "Is Primary", 0.0, 1.0).with_step(1.0);
        let mut store = FilterStore::new();
        store.nudge(&flag, RangeBound::Upper, -1);
        store.nudge(&flag, RangeBound::Lower, 1);
        assert_eq!(store.get("isPrimary"), Some(&FilterValue::range(0.0, 0.0)));
    }

    #[test]
    fn test_active_filters_wire_format() {
        let active = score_filter(1.0, 2.0);
        let json = serde_json::to_string(&active).unwrap();
        assert_eq!(json, r#"{"score":{"min":1.0,"max":2.0}}"#);
    }
}
