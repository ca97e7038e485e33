//! Data source identity and query mode.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Where records come from. Identity of the source is part of every cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataSource {
    /// `http://` or `https://` URL.
    Http(String),
    /// Local JSON file.
    File(PathBuf),
}

impl DataSource {
    /// Classify a configured location: anything with an http(s) scheme is a
    /// URL, everything else a file path.
    pub fn parse(location: &str) -> DataSource {
        let trimmed = location.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Http(trimmed.to_string())
        } else {
            DataSource::File(PathBuf::from(trimmed))
        }
    }

    pub fn is_http(&self) -> bool {
        matches!(self, DataSource::Http(_))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            DataSource::Http(url) => url.is_empty(),
            DataSource::File(path) => path.as_os_str().is_empty(),
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Http(url) => f.write_str(url),
            DataSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Whether filtering and paging happen locally or at the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// Load the full dataset once; filter and page in the view.
    #[default]
    Client,
    /// Ask the source for one filtered page at a time.
    Server,
}

impl QueryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryMode::Client => "client",
            QueryMode::Server => "server",
        }
    }
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
