//! List query component.
//!
//! A synchronous state machine over a keyed result cache. The owner calls
//! [`ListQuery::observe`] whenever its parameters may have changed; a
//! returned [`FetchRequest`] is executed off the main task and its outcome
//! handed back through [`ListQuery::resolve`]. [`ListQuery::result`] reports
//! the status of the most recently observed key.

use crate::error::{FetchError, QueryError};
use crate::fetcher::RecordFetcher;
use crate::key::QueryKey;
use crate::server::ServerQuery;
use crate::source::{DataSource, QueryMode};
use chrono::{DateTime, Utc};
use homolog_core::{ActiveFilters, FilterConfig, HomologRecord, QueryState, DEFAULT_PAGE_SIZE};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

/// Inputs of one list query observation. Borrowed from the owning page.
#[derive(Debug, Clone, Copy)]
pub struct ListQueryParams<'a> {
    pub active_filters: &'a ActiveFilters,
    pub data_source: &'a DataSource,
    pub filter_configs: &'a [FilterConfig],
    pub offset: usize,
    pub page: usize,
    pub page_size: usize,
    pub query_mode: QueryMode,
    pub static_params: Option<&'a Value>,
    pub search_term: &'a str,
}

impl<'a> ListQueryParams<'a> {
    /// Client mode, first page, default page size, no search.
    pub fn new(
        data_source: &'a DataSource,
        active_filters: &'a ActiveFilters,
        filter_configs: &'a [FilterConfig],
    ) -> Self {
        Self {
            active_filters,
            data_source,
            filter_configs,
            offset: 0,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            query_mode: QueryMode::Client,
            static_params: None,
            search_term: "",
        }
    }

    pub fn with_pagination(mut self, state: &QueryState) -> Self {
        self.offset = state.offset();
        self.page = state.page();
        self.page_size = state.page_size();
        self
    }

    pub fn with_mode(mut self, mode: QueryMode) -> Self {
        self.query_mode = mode;
        self
    }

    pub fn with_static_params(mut self, params: Option<&'a Value>) -> Self {
        self.static_params = params;
        self
    }

    pub fn with_search(mut self, search_term: &'a str) -> Self {
        self.search_term = search_term;
        self
    }

    pub fn server_query(&self) -> ServerQuery {
        ServerQuery::new(
            self.offset,
            self.page,
            self.page_size,
            self.active_filters,
            self.filter_configs,
            self.search_term,
            self.static_params,
        )
    }

    pub fn key(&self) -> QueryKey {
        match self.query_mode {
            QueryMode::Client => QueryKey::client(self.data_source.clone()),
            QueryMode::Server => {
                let params = serde_json::to_string(&self.server_query()).unwrap_or_default();
                QueryKey::server(self.data_source.clone(), params)
            }
        }
    }
}

/// A loaded result set: the full dataset in client mode, one page in server mode.
#[derive(Debug, Clone, PartialEq)]
pub struct ListData {
    pub rows: Arc<Vec<HomologRecord>>,
    pub total_count: usize,
}

impl ListData {
    pub fn full(rows: Vec<HomologRecord>) -> Self {
        let total_count = rows.len();
        Self {
            rows: Arc::new(rows),
            total_count,
        }
    }

    pub fn page(rows: Vec<HomologRecord>, total_count: usize) -> Self {
        Self {
            rows: Arc::new(rows),
            total_count,
        }
    }
}

/// Load status of the current key.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListQueryResult {
    pub is_pending: bool,
    pub is_fetching: bool,
    pub is_error: bool,
    pub data: Option<ListData>,
    pub error: Option<QueryError>,
}

impl ListQueryResult {
    pub fn pending() -> Self {
        Self {
            is_pending: true,
            ..Self::default()
        }
    }

    pub fn is_success(&self) -> bool {
        !self.is_pending && !self.is_error && self.data.is_some()
    }

    /// Rows to display, or an empty slice.
    pub fn rows(&self) -> &[HomologRecord] {
        self.data.as_ref().map(|data| data.rows.as_slice()).unwrap_or(&[])
    }
}

/// Work handed to a fetch task. Owns everything it needs.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub key: QueryKey,
    pub source: DataSource,
    pub server: Option<ServerQuery>,
}

impl FetchRequest {
    pub async fn execute<F>(&self, fetcher: &F) -> Result<ListData, FetchError>
    where
        F: RecordFetcher + ?Sized,
    {
        match &self.server {
            Some(query) => fetcher.fetch_page(&self.source, query).await,
            None => fetcher.fetch_all(&self.source).await.map(ListData::full),
        }
    }
}

#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Age after which a cached result is refetched. `None` never goes stale.
    pub stale_time: Option<Duration>,
    /// Cached result sets kept before the oldest is evicted.
    pub max_entries: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            stale_time: None,
            max_entries: 32,
        }
    }
}

impl QueryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stale_time(mut self, stale_time: Option<Duration>) -> Self {
        self.stale_time = stale_time;
        self
    }

    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = max.max(1);
        self
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    data: ListData,
    fetched_at: DateTime<Utc>,
    invalidated: bool,
}

impl CacheEntry {
    fn is_fresh(&self, stale_time: Option<Duration>) -> bool {
        if self.invalidated {
            return false;
        }
        match stale_time {
            None => true,
            Some(stale) => {
                let age = (Utc::now() - self.fetched_at).to_std().unwrap_or_default();
                age < stale
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct ListQuery {
    config: QueryConfig,
    cache: HashMap<QueryKey, CacheEntry>,
    in_flight: HashSet<QueryKey>,
    errors: HashMap<QueryKey, QueryError>,
    current: Option<QueryKey>,
    last_displayed: Option<ListData>,
}

impl ListQuery {
    pub fn new(config: QueryConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn current_key(&self) -> Option<&QueryKey> {
        self.current.as_ref()
    }

    pub fn is_in_flight(&self, key: &QueryKey) -> bool {
        self.in_flight.contains(key)
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Number of keys currently holding an error.
    pub fn error_len(&self) -> usize {
        self.errors.len()
    }

    /// Make `params` the current key. Returns a request when the key has no
    /// fresh result and none is in flight.
    pub fn observe(&mut self, params: &ListQueryParams<'_>) -> Option<FetchRequest> {
        let key = params.key();
        if self.current.as_ref() != Some(&key) {
            if let Some(previous) = self.current.as_ref().and_then(|k| self.cache.get(k)) {
                self.last_displayed = Some(previous.data.clone());
            }
            tracing::debug!(key = %key, "Query key changed");
            self.current = Some(key.clone());
        }

        if self.in_flight.contains(&key) || self.errors.contains_key(&key) {
            return None;
        }
        if let Some(entry) = self.cache.get(&key) {
            if entry.is_fresh(self.config.stale_time) {
                return None;
            }
        }

        self.in_flight.insert(key.clone());
        let server = match params.query_mode {
            QueryMode::Client => None,
            QueryMode::Server => Some(params.server_query()),
        };
        Some(FetchRequest {
            key,
            source: params.data_source.clone(),
            server,
        })
    }

    /// Record the outcome of a request. Results for a key that is no longer
    /// current are cached but leave the current status alone.
    pub fn resolve(&mut self, key: QueryKey, outcome: Result<ListData, FetchError>) {
        self.in_flight.remove(&key);
        let is_current = self.current.as_ref() == Some(&key);

        match outcome {
            Ok(data) => {
                tracing::debug!(key = %key, rows = data.rows.len(), total = data.total_count, is_current, "Query resolved");
                self.errors.remove(&key);
                if is_current {
                    self.last_displayed = Some(data.clone());
                }
                self.cache.insert(
                    key,
                    CacheEntry {
                        data,
                        fetched_at: Utc::now(),
                        invalidated: false,
                    },
                );
                self.evict();
            }
            Err(err) => {
                tracing::warn!(key = %key, kind = err.kind(), error = %err, is_current, "Query failed");
                self.errors.insert(key, QueryError::from(&err));
                self.evict_errors();
            }
        }
    }

    /// Drop the cached result and any error for `params`, then observe again.
    pub fn refetch(&mut self, params: &ListQueryParams<'_>) -> Option<FetchRequest> {
        let key = params.key();
        if let Some(entry) = self.cache.get_mut(&key) {
            entry.invalidated = true;
        }
        self.errors.remove(&key);
        self.observe(params)
    }

    /// Mark every cached result stale and forget errors.
    pub fn invalidate_all(&mut self) {
        for entry in self.cache.values_mut() {
            entry.invalidated = true;
        }
        self.errors.clear();
    }

    pub fn result(&self) -> ListQueryResult {
        let Some(key) = self.current.as_ref() else {
            return ListQueryResult::pending();
        };
        let cached = self.cache.get(key).map(|entry| entry.data.clone());

        if self.in_flight.contains(key) {
            let data = cached.or_else(|| self.last_displayed.clone());
            return ListQueryResult {
                is_pending: data.is_none(),
                is_fetching: true,
                data,
                ..ListQueryResult::default()
            };
        }
        if let Some(error) = self.errors.get(key) {
            return ListQueryResult {
                is_error: true,
                error: Some(error.clone()),
                ..ListQueryResult::default()
            };
        }
        match cached {
            Some(data) => ListQueryResult {
                data: Some(data),
                ..ListQueryResult::default()
            },
            None => ListQueryResult::pending(),
        }
    }

    /// Observe, fetch if needed, resolve, and report.
    pub async fn run<F>(&mut self, params: &ListQueryParams<'_>, fetcher: &F) -> ListQueryResult
    where
        F: RecordFetcher + ?Sized,
    {
        if let Some(request) = self.observe(params) {
            let outcome = request.execute(fetcher).await;
            self.resolve(request.key, outcome);
        }
        self.result()
    }

    /// Drop error entries beyond `max_entries`, never the current key's.
    fn evict_errors(&mut self) {
        while self.errors.len() > self.config.max_entries {
            let victim = self
                .errors
                .keys()
                .find(|key| self.current.as_ref() != Some(*key))
                .cloned();
            match victim {
                Some(key) => {
                    self.errors.remove(&key);
                }
                None => break,
            }
        }
    }

    fn evict(&mut self) {
        while self.cache.len() > self.config.max_entries {
            let oldest = self
                .cache
                .iter()
                .filter(|(key, _)| self.current.as_ref() != Some(*key))
                .min_by_key(|(_, entry)| entry.fetched_at)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => {
                    self.cache.remove(&key);
                }
                None => break,
            }
        }
    }
}
