//! Homolog record model.
//!
//! Records arrive as loosely shaped JSON objects. They are validated exactly
//! once, here, and are typed and immutable from then on. A row without a
//! usable `_id` is rejected; any other missing or mistyped field is stored as
//! absent so that filter predicates can fail closed on it.

use crate::error::{RecordError, RowRejection};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;

/// Unique record identifier (`_id` on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Value category of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Text,
    Number,
}

/// Every attribute of a [`HomologRecord`], named by its wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordField {
    Id,
    QueryTranscriptName,
    QueryLocusName,
    QueryIdentifier,
    HitTranscriptName,
    HitLocusName,
    HitIdentifier,
    HitDefline,
    HitProteome,
    ToProt,
    Identities,
    Coverage,
    Positives,
    Score,
    Evalue,
    IsPrimary,
    IntQueryIdentifier,
    IntHitIdentifier,
    InsertString,
}

impl RecordField {
    /// All fields in display order.
    pub const ALL: [RecordField; 19] = [
        RecordField::Id,
        RecordField::QueryTranscriptName,
        RecordField::QueryLocusName,
        RecordField::QueryIdentifier,
        RecordField::HitTranscriptName,
        RecordField::HitLocusName,
        RecordField::HitIdentifier,
        RecordField::HitDefline,
        RecordField::HitProteome,
        RecordField::ToProt,
        RecordField::Identities,
        RecordField::Coverage,
        RecordField::Positives,
        RecordField::Score,
        RecordField::Evalue,
        RecordField::IsPrimary,
        RecordField::IntQueryIdentifier,
        RecordField::IntHitIdentifier,
        RecordField::InsertString,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordField::Id => "_id",
            RecordField::QueryTranscriptName => "queryTranscriptName",
            RecordField::QueryLocusName => "queryLocusName",
            RecordField::QueryIdentifier => "queryIdentifier",
            RecordField::HitTranscriptName => "hitTranscriptName",
            RecordField::HitLocusName => "hitLocusName",
            RecordField::HitIdentifier => "hitIdentifier",
            RecordField::HitDefline => "hitDefline",
            RecordField::HitProteome => "hitProteome",
            RecordField::ToProt => "toProt",
            RecordField::Identities => "identities",
            RecordField::Coverage => "coverage",
            RecordField::Positives => "positives",
            RecordField::Score => "score",
            RecordField::Evalue => "evalue",
            RecordField::IsPrimary => "isPrimary",
            RecordField::IntQueryIdentifier => "intQueryIdentifier",
            RecordField::IntHitIdentifier => "intHitIdentifier",
            RecordField::InsertString => "insertString",
        }
    }

    pub fn from_name(name: &str) -> Option<RecordField> {
        Self::ALL.iter().copied().find(|field| field.as_str() == name)
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            RecordField::Identities
            | RecordField::Coverage
            | RecordField::Positives
            | RecordField::Score
            | RecordField::Evalue
            | RecordField::IsPrimary
            | RecordField::IntQueryIdentifier
            | RecordField::IntHitIdentifier => FieldKind::Number,
            _ => FieldKind::Text,
        }
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One sequence-similarity match between a query transcript and a hit
/// transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomologRecord {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub query_transcript_name: Option<String>,
    pub query_locus_name: Option<String>,
    pub query_identifier: Option<String>,
    pub hit_transcript_name: Option<String>,
    pub hit_locus_name: Option<String>,
    pub hit_identifier: Option<String>,
    pub hit_defline: Option<String>,
    pub hit_proteome: Option<String>,
    pub to_prot: Option<String>,
    pub identities: Option<f64>,
    pub coverage: Option<f64>,
    pub positives: Option<f64>,
    pub score: Option<f64>,
    pub evalue: Option<f64>,
    /// 0 or 1. Booleans on the wire are folded into this form.
    pub is_primary: Option<u8>,
    pub int_query_identifier: Option<i64>,
    pub int_hit_identifier: Option<i64>,
    pub insert_string: Option<String>,
}

impl HomologRecord {
    /// A record carrying only its identifier.
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            query_transcript_name: None,
            query_locus_name: None,
            query_identifier: None,
            hit_transcript_name: None,
            hit_locus_name: None,
            hit_identifier: None,
            hit_defline: None,
            hit_proteome: None,
            to_prot: None,
            identities: None,
            coverage: None,
            positives: None,
            score: None,
            evalue: None,
            is_primary: None,
            int_query_identifier: None,
            int_hit_identifier: None,
            insert_string: None,
        }
    }

    /// Validate one raw row.
    pub fn from_value(index: usize, value: &Value) -> Result<Self, RowRejection> {
        let map = value
            .as_object()
            .ok_or(RowRejection::NotAnObject { index })?;
        let id = text_field(map, RecordField::Id)
            .filter(|id| !id.is_empty())
            .ok_or(RowRejection::MissingId { index })?;

        Ok(Self {
            id: RecordId(id),
            query_transcript_name: text_field(map, RecordField::QueryTranscriptName),
            query_locus_name: text_field(map, RecordField::QueryLocusName),
            query_identifier: text_field(map, RecordField::QueryIdentifier),
            hit_transcript_name: text_field(map, RecordField::HitTranscriptName),
            hit_locus_name: text_field(map, RecordField::HitLocusName),
            hit_identifier: text_field(map, RecordField::HitIdentifier),
            hit_defline: text_field(map, RecordField::HitDefline),
            hit_proteome: text_field(map, RecordField::HitProteome),
            to_prot: text_field(map, RecordField::ToProt),
            identities: number_field(map, RecordField::Identities),
            coverage: number_field(map, RecordField::Coverage),
            positives: number_field(map, RecordField::Positives),
            score: number_field(map, RecordField::Score),
            evalue: number_field(map, RecordField::Evalue),
            is_primary: flag_field(map, RecordField::IsPrimary),
            int_query_identifier: integer_field(map, RecordField::IntQueryIdentifier),
            int_hit_identifier: integer_field(map, RecordField::IntHitIdentifier),
            insert_string: text_field(map, RecordField::InsertString),
        })
    }

    /// Numeric value of a field by wire name. Text and unknown fields are
    /// `None`, as are absent values.
    pub fn numeric(&self, field: &str) -> Option<f64> {
        RecordField::from_name(field).and_then(|field| self.numeric_field(field))
    }

    pub fn numeric_field(&self, field: RecordField) -> Option<f64> {
        match field {
            RecordField::Identities => self.identities,
            RecordField::Coverage => self.coverage,
            RecordField::Positives => self.positives,
            RecordField::Score => self.score,
            RecordField::Evalue => self.evalue,
            RecordField::IsPrimary => self.is_primary.map(f64::from),
            RecordField::IntQueryIdentifier => self.int_query_identifier.map(|v| v as f64),
            RecordField::IntHitIdentifier => self.int_hit_identifier.map(|v| v as f64),
            _ => None,
        }
    }

    /// Text value of a field by wire name.
    pub fn text(&self, field: &str) -> Option<&str> {
        RecordField::from_name(field).and_then(|field| self.text_field(field))
    }

    pub fn text_field(&self, field: RecordField) -> Option<&str> {
        match field {
            RecordField::Id => Some(self.id.as_str()),
            RecordField::QueryTranscriptName => self.query_transcript_name.as_deref(),
            RecordField::QueryLocusName => self.query_locus_name.as_deref(),
            RecordField::QueryIdentifier => self.query_identifier.as_deref(),
            RecordField::HitTranscriptName => self.hit_transcript_name.as_deref(),
            RecordField::HitLocusName => self.hit_locus_name.as_deref(),
            RecordField::HitIdentifier => self.hit_identifier.as_deref(),
            RecordField::HitDefline => self.hit_defline.as_deref(),
            RecordField::HitProteome => self.hit_proteome.as_deref(),
            RecordField::ToProt => self.to_prot.as_deref(),
            RecordField::InsertString => self.insert_string.as_deref(),
            _ => None,
        }
    }

    /// Display string for any field; absent values render empty.
    pub fn display(&self, field: RecordField) -> String {
        match field.kind() {
            FieldKind::Text => self.text_field(field).unwrap_or_default().to_string(),
            FieldKind::Number => match field {
                RecordField::IntQueryIdentifier => opt_to_string(self.int_query_identifier),
                RecordField::IntHitIdentifier => opt_to_string(self.int_hit_identifier),
                RecordField::IsPrimary => opt_to_string(self.is_primary),
                _ => opt_to_string(self.numeric_field(field)),
            },
        }
    }
}

fn opt_to_string<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn text_field(map: &Map<String, Value>, field: RecordField) -> Option<String> {
    match map.get(field.as_str())? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn number_field(map: &Map<String, Value>, field: RecordField) -> Option<f64> {
    map.get(field.as_str())?.as_f64().filter(|v| v.is_finite())
}

fn integer_field(map: &Map<String, Value>, field: RecordField) -> Option<i64> {
    map.get(field.as_str())?.as_i64()
}

fn flag_field(map: &Map<String, Value>, field: RecordField) -> Option<u8> {
    match map.get(field.as_str())? {
        Value::Bool(b) => Some(u8::from(*b)),
        Value::Number(n) => match n.as_f64() {
            Some(v) if v == 0.0 => Some(0),
            Some(v) if v == 1.0 => Some(1),
            _ => None,
        },
        _ => None,
    }
}

/// Outcome counts of a load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub accepted: usize,
    pub rejected: Vec<RowRejection>,
}

impl LoadReport {
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }
}

/// Parse a JSON array document into validated records.
///
/// Rows that fail validation are skipped and listed in the report; the
/// order of accepted rows matches the document.
pub fn parse_records(bytes: &[u8]) -> Result<(Vec<HomologRecord>, LoadReport), RecordError> {
    let document: Value = serde_json::from_slice(bytes)?;
    let rows = match document {
        Value::Array(rows) => rows,
        other => {
            return Err(RecordError::NotAnArray {
                found: json_kind(&other),
            })
        }
    };
    Ok(validate_rows(&rows))
}

/// Validate an already-decoded list of rows.
pub fn validate_rows(rows: &[Value]) -> (Vec<HomologRecord>, LoadReport) {
    let mut records = Vec::with_capacity(rows.len());
    let mut report = LoadReport::default();
    let mut seen = HashSet::with_capacity(rows.len());

    for (index, row) in rows.iter().enumerate() {
        match HomologRecord::from_value(index, row) {
            Ok(record) => {
                if !seen.insert(record.id.clone()) {
                    report.rejected.push(RowRejection::DuplicateId {
                        index,
                        id: record.id.to_string(),
                    });
                    continue;
                }
                records.push(record);
            }
            Err(rejection) => report.rejected.push(rejection),
        }
    }
    report.accepted = records.len();

    if !report.rejected.is_empty() {
        tracing::warn!(
            accepted = report.accepted,
            rejected = report.rejected.len(),
            first = %report.rejected[0],
            "Rejected malformed homolog rows"
        );
    }
    (records, report)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ============================================================================
// TESTS
// ============================================================================
