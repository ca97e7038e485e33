//! List query layer for the homolog explorer.
//!
//! Loads homolog records from a [`DataSource`] in one of two [`QueryMode`]s
//! and tracks the load status of the current parameters:
//! - **client**: the whole dataset is fetched once per source and the view
//!   filters and pages it locally
//! - **server**: every distinct page request is fetched and cached by key
//!
//! Fetchers retry transient failures with backoff; [`ListQuery`] only sees
//! the final outcome.

pub mod error;
pub mod fetcher;
pub mod key;
pub mod list_query;
pub mod retry;
pub mod server;
pub mod source;

pub use error::{FetchError, QueryError};
pub use fetcher::{FileFetcher, HttpFetcher, RecordFetcher, SourceFetcher};
pub use key::QueryKey;
pub use list_query::{
    FetchRequest, ListData, ListQuery, ListQueryParams, ListQueryResult, QueryConfig,
};
pub use retry::{with_retry, RetryPolicy};
pub use server::{PageResponse, ServerQuery};
pub use source::{DataSource, QueryMode};
