//! Configuration loading for the homolog explorer.
//!
//! Loaded from a TOML file named by `--config` or `HOMOLOG_EXPLORER_CONFIG`.
//! Everything except `query_mode`, `page_size`, `stale_time_ms`,
//! `static_params` and `filters` is required.

use homolog_core::{homolog_filter_configs, FilterConfig, DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};
use homolog_query::{DataSource, QueryConfig, QueryMode, RetryPolicy};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExplorerConfig {
    /// URL or file path of the homolog dataset.
    pub data_source: String,
    #[serde(default)]
    pub query_mode: QueryMode,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    pub request_timeout_ms: u64,
    pub refresh_interval_ms: u64,
    /// Unset means a loaded result never goes stale.
    #[serde(default)]
    pub stale_time_ms: Option<u64>,
    pub log_path: PathBuf,
    pub theme: ThemeConfig,
    pub retry: RetryConfig,
    /// Forwarded verbatim to server-mode sources.
    #[serde(default)]
    pub static_params: Option<serde_json::Value>,
    #[serde(default = "homolog_filter_configs")]
    pub filters: Vec<FilterConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThemeConfig {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_ms: u64,
    pub max_ms: u64,
    pub multiplier: f64,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration file path (use --config or HOMOLOG_EXPLORER_CONFIG)")]
    MissingConfigPath,
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl ExplorerConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path_from_args().or_else(config_path_from_env);
        let path = path.ok_or(ConfigError::MissingConfigPath)?;
        let config = Self::from_path(&path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: ExplorerConfig = toml::from_str(contents)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_source.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "data_source",
                reason: "must not be empty".to_string(),
            });
        }
        if self.query_mode == QueryMode::Server && !self.data_source().is_http() {
            return Err(ConfigError::InvalidValue {
                field: "query_mode",
                reason: "server mode needs an http(s) data_source".to_string(),
            });
        }
        if !PAGE_SIZE_OPTIONS.contains(&self.page_size) {
            return Err(ConfigError::InvalidValue {
                field: "page_size",
                reason: format!("must be one of {:?}", PAGE_SIZE_OPTIONS),
            });
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.refresh_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "refresh_interval_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.log_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "log_path",
                reason: "must not be empty".to_string(),
            });
        }
        if self.theme.name.to_ascii_lowercase() != "synthbrute" {
            return Err(ConfigError::InvalidValue {
                field: "theme.name",
                reason: "only 'synthbrute' is supported".to_string(),
            });
        }
        if self.retry.initial_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.initial_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.retry.max_ms < self.retry.initial_ms {
            return Err(ConfigError::InvalidValue {
                field: "retry.max_ms",
                reason: "must be >= initial_ms".to_string(),
            });
        }
        if self.retry.multiplier < 1.0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.multiplier",
                reason: "must be >= 1.0".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for filter in &self.filters {
            filter.validate().map_err(|err| ConfigError::InvalidValue {
                field: "filters",
                reason: err.to_string(),
            })?;
            if !seen.insert(filter.field.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: "filters",
                    reason: format!("duplicate filter for '{}'", filter.field),
                });
            }
        }
        Ok(())
    }

    pub fn data_source(&self) -> DataSource {
        DataSource::parse(&self.data_source)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.retry.max_retries,
            initial_backoff: Duration::from_millis(self.retry.initial_ms),
            max_backoff: Duration::from_millis(self.retry.max_ms),
            backoff_multiplier: self.retry.multiplier,
        }
    }

    pub fn query_config(&self) -> QueryConfig {
        QueryConfig::new().with_stale_time(self.stale_time_ms.map(Duration::from_millis))
    }
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var("HOMOLOG_EXPLORER_CONFIG").ok().map(PathBuf::from)
}

fn config_path_from_args() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}
