//! Data-source fetchers.

use crate::error::FetchError;
use crate::list_query::ListData;
use crate::retry::{with_retry, RetryPolicy};
use crate::server::{PageResponse, ServerQuery};
use crate::source::DataSource;
use async_trait::async_trait;
use homolog_core::{parse_records, HomologRecord};
use std::path::Path;
use std::time::Duration;

/// Loads records from a [`DataSource`].
#[async_trait]
pub trait RecordFetcher: Send + Sync {
    /// The entire dataset (client mode).
    async fn fetch_all(&self, source: &DataSource) -> Result<Vec<HomologRecord>, FetchError>;

    /// One filtered page plus the total row count (server mode).
    async fn fetch_page(
        &self,
        source: &DataSource,
        query: &ServerQuery,
    ) -> Result<ListData, FetchError>;
}

#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, retry: RetryPolicy) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, retry })
    }

    async fn get_bytes(&self, url: &str, query: &[(&str, String)]) -> Result<Vec<u8>, FetchError> {
        let mut request = self.client.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(response.bytes().await?.to_vec())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(FetchError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}

fn require_url(source: &DataSource) -> Result<&str, FetchError> {
    match source {
        DataSource::Http(url) => Ok(url),
        DataSource::File(path) => Err(FetchError::InvalidSource(format!(
            "expected an http(s) URL, got {}",
            path.display()
        ))),
    }
}

#[async_trait]
impl RecordFetcher for HttpFetcher {
    async fn fetch_all(&self, source: &DataSource) -> Result<Vec<HomologRecord>, FetchError> {
        let url = require_url(source)?;
        let bytes = with_retry(&self.retry, || self.get_bytes(url, &[])).await?;
        let (records, report) = parse_records(&bytes)?;
        tracing::info!(source = %source, accepted = report.accepted, rejected = report.rejected_count(), "Loaded dataset");
        Ok(records)
    }

    async fn fetch_page(
        &self,
        source: &DataSource,
        query: &ServerQuery,
    ) -> Result<ListData, FetchError> {
        let url = require_url(source)?;
        let pairs = query.to_query_pairs()?;
        let bytes = with_retry(&self.retry, || self.get_bytes(url, &pairs)).await?;
        let response: PageResponse = serde_json::from_slice(&bytes)?;
        let (records, total_count, report) = response.into_records();
        tracing::debug!(
            source = %source,
            offset = query.offset,
            rows = report.accepted,
            total_count,
            "Loaded page"
        );
        Ok(ListData::page(records, total_count))
    }
}

/// Reads a JSON array of records from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFetcher;

impl FileFetcher {
    pub async fn load(path: &Path) -> Result<Vec<HomologRecord>, FetchError> {
        let bytes = tokio::fs::read(path).await?;
        let (records, report) = parse_records(&bytes)?;
        tracing::info!(
            path = %path.display(),
            accepted = report.accepted,
            rejected = report.rejected_count(),
            "Loaded dataset"
        );
        Ok(records)
    }
}

#[async_trait]
impl RecordFetcher for FileFetcher {
    async fn fetch_all(&self, source: &DataSource) -> Result<Vec<HomologRecord>, FetchError> {
        match source {
            DataSource::File(path) => Self::load(path).await,
            DataSource::Http(url) => Err(FetchError::InvalidSource(format!(
                "expected a file path, got {url}"
            ))),
        }
    }

    async fn fetch_page(
        &self,
        source: &DataSource,
        _query: &ServerQuery,
    ) -> Result<ListData, FetchError> {
        Err(FetchError::InvalidSource(format!(
            "server query mode needs an http(s) source, got {source}"
        )))
    }
}

/// Routes each request to the fetcher matching the source kind.
#[derive(Clone)]
pub struct SourceFetcher {
    http: HttpFetcher,
    file: FileFetcher,
}

impl SourceFetcher {
    pub fn new(timeout: Duration, retry: RetryPolicy) -> Result<Self, FetchError> {
        Ok(Self {
            http: HttpFetcher::new(timeout, retry)?,
            file: FileFetcher,
        })
    }
}

#[async_trait]
impl RecordFetcher for SourceFetcher {
    async fn fetch_all(&self, source: &DataSource) -> Result<Vec<HomologRecord>, FetchError> {
        match source {
            DataSource::Http(_) => self.http.fetch_all(source).await,
            DataSource::File(_) => self.file.fetch_all(source).await,
        }
    }

    async fn fetch_page(
        &self,
        source: &DataSource,
        query: &ServerQuery,
    ) -> Result<ListData, FetchError> {
        match source {
            DataSource::Http(_) => self.http.fetch_page(source, query).await,
            DataSource::File(_) => self.file.fetch_page(source, query).await,
        }
    }
}
