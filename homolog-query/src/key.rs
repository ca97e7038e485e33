//! Cache identity of a result set.

use crate::source::{DataSource, QueryMode};
use std::fmt;

/// Data source plus the parameters that select a result set.
///
/// Client mode keys only on the source: the full dataset does not depend on
/// pagination or filters. Server mode adds the canonical JSON of the page
/// request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub source: DataSource,
    pub mode: QueryMode,
    pub params: Option<String>,
}

impl QueryKey {
    pub fn client(source: DataSource) -> Self {
        Self {
            source,
            mode: QueryMode::Client,
            params: None,
        }
    }

    pub fn server(source: DataSource, params: String) -> Self {
        Self {
            source,
            mode: QueryMode::Server,
            params: Some(params),
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.params {
            Some(params) => write!(f, "{}:{}?{}", self.mode, self.source, params),
            None => write!(f, "{}:{}", self.mode, self.source),
        }
    }
}
