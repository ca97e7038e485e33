//! Error types for record loading and configuration validation

use thiserror::Error;

/// Errors raised while turning a raw JSON document into typed records.
///
/// Only document-level problems are errors. Individual malformed rows are
/// rejected and counted in [`crate::LoadReport`] instead.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Failed to decode record document: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Record document must be a JSON array, found {found}")]
    NotAnArray { found: &'static str },
}

/// Row-level rejection reasons, reported per index during loading.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RowRejection {
    #[error("Row {index} is not a JSON object")]
    NotAnObject { index: usize },

    #[error("Row {index} has no usable _id")]
    MissingId { index: usize },

    #[error("Row {index} repeats _id {id}")]
    DuplicateId { index: usize, id: String },
}

/// Validation errors for filter configuration and active filter values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Unknown record field: {field}")]
    UnknownField { field: String },
}
