//! Homolog Explorer Core
//!
//! Typed homolog records validated once at the load boundary, the static
//! filter configuration model, the filter predicate evaluator, and the
//! pagination controller. Nothing in this crate performs I/O.

pub mod config;
pub mod error;
pub mod filter;
pub mod pagination;
pub mod record;

pub use config::{
    homolog_filter_configs, FilterComponent, FilterConfig, FilterOperator, FilterProps,
};
pub use error::{RecordError, RowRejection, ValidationError};
pub use filter::{
    filter_data, matches_filters, matches_search, ActiveFilters, FilterStore, FilterValue,
    RangeBound, SearchTerm, SEARCHABLE_FIELDS,
};
pub use pagination::{PaginationModel, QueryState, DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};
pub use record::{
    parse_records, validate_rows, FieldKind, HomologRecord, LoadReport, RecordField, RecordId,
};
