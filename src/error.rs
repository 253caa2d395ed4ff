//! Error types for fetching, scraping, configuration and batch orchestration.
//!
//! Only [`BatchError`] ever reaches the caller of a batch; the other errors are
//! recovered per source and folded into a failure-shaped
//! [`ScrapeOutcome`](crate::models::ScrapeOutcome).

use crate::models::SourceResult;
use thiserror::Error;

/// Failure of a single HTTP GET.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
    #[error("timed out fetching {url}")]
    Timeout { url: String },
    #[error("failed to read body: {0}")]
    Body(#[source] reqwest::Error),
    #[error("fetch cancelled")]
    Cancelled,
    #[error("batch deadline exceeded")]
    DeadlineExceeded,
}

/// Failure of fetch + discovery for one source.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("invalid source url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Configuration could not be loaded or is inconsistent.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Batch-level failure escalated to the caller.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("no news sources found for topic {topic:?} in {country:?}")]
    NoSources { topic: String, country: String },
    /// Every source failed or yielded nothing; `results` is the full audit trail.
    #[error("failed to scrape any content from {} news sources", results.len())]
    NoContent { results: Vec<SourceResult> },
}

impl BatchError {
    /// The per-source audit trail, empty when no source was attempted.
    pub fn results(&self) -> &[SourceResult] {
        match self {
            BatchError::NoSources { .. } => &[],
            BatchError::NoContent { results } => results,
        }
    }
}
