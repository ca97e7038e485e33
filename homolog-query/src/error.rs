//! Error types for the fetch layer and the load status envelope.

use homolog_core::RecordError;
use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Records(#[from] RecordError),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Invalid data source: {0}")]
    InvalidSource(String),
}

impl FetchError {
    /// Whether a retry has a chance of succeeding.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Http(err) => err.is_timeout() || err.is_connect(),
            FetchError::Status { status, .. } => *status == 408 || *status == 429 || *status >= 500,
            FetchError::Io(err) => matches!(
                err.kind(),
                std::io::ErrorKind::Interrupted | std::io::ErrorKind::TimedOut
            ),
            FetchError::Records(_) | FetchError::Serde(_) | FetchError::InvalidSource(_) => false,
        }
    }

    /// Short name of the failing layer, for logs and grouping.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Http(_) => "http",
            FetchError::Io(_) => "io",
            FetchError::Records(_) => "records",
            FetchError::Serde(_) => "serde",
            FetchError::Status { .. } => "status",
            FetchError::InvalidSource(_) => "source",
        }
    }

    /// The underlying failure text without the variant prefix.
    pub fn detail(&self) -> String {
        match self {
            FetchError::Http(err) => err.to_string(),
            FetchError::Io(err) => err.to_string(),
            FetchError::Records(err) => err.to_string(),
            FetchError::Serde(err) => err.to_string(),
            FetchError::Status { status, body } if body.trim().is_empty() => {
                format!("status {}", status)
            }
            FetchError::Status { body, .. } => body.clone(),
            FetchError::InvalidSource(source) => source.clone(),
        }
    }
}

/// Failure carried by a [`crate::ListQueryResult`].
///
/// `message` is the text the source failed with; `kind` names the layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    pub kind: &'static str,
    pub message: String,
}

impl QueryError {
    pub fn new(kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for QueryError {}

impl From<&FetchError> for QueryError {
    fn from(err: &FetchError) -> Self {
        Self::new(err.kind(), err.detail())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transience() {
        let transient = |status| FetchError::Status { status, body: String::new() }.is_transient();
        assert!(transient(503));
        assert!(transient(429));
        assert!(transient(408));
        assert!(!transient(404));
        assert!(!transient(400));
    }

    #[test]
    fn test_decode_errors_are_permanent() {
        let err = FetchError::InvalidSource("nope".to_string());
        assert!(!err.is_transient());
    }

    #[test]
    fn test_query_error_carries_message() {
        let err = FetchError::Status {
            status: 500,
            body: "boom".to_string(),
        };
        let query_error = QueryError::from(&err);
        assert_eq!(query_error.message, "boom");
        assert_eq!(query_error.kind, "status");
    }

    #[test]
    fn test_query_error_drops_variant_prefix() {
        let err = FetchError::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "network error",
        ));
        assert_eq!(err.to_string(), "IO error: network error");
        let query_error = QueryError::from(&err);
        assert_eq!(query_error.message, "network error");
        assert_eq!(query_error.kind, "io");
    }

    #[test]
    fn test_empty_status_body_falls_back_to_code() {
        let err = FetchError::Status {
            status: 502,
            body: "  ".to_string(),
        };
        assert_eq!(QueryError::from(&err).message, "status 502");
    }
}
