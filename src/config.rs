//! Runtime configuration for discovery and orchestration.
//!
//! Every field has a default, so an empty YAML document (or no file at all)
//! yields the standard limits: 5 sources per batch, 10 headlines carried per
//! source, 15 discovered per page, score threshold 1, 30 second timeout.
//!
//! ```yaml
//! max_sources: 5
//! min_score: 2
//! request_timeout_secs: 20
//! extra_allowed_domains:
//!   - example-local-news.com
//! ```

use crate::discovery::DiscoveryOptions;
use crate::discovery::allowlist::DomainAllowList;
use crate::error::ConfigError;
use crate::fetcher::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Sources scraped per batch; the rest of the input is ignored.
    pub max_sources: usize,
    /// Headlines carried into `SourceNewsData` per source.
    pub max_headlines_per_source: usize,
    /// Headlines discovery may return per page.
    pub max_discovered_headlines: usize,
    /// Broaden to every anchor when fewer than this many were found.
    pub broaden_below: usize,
    /// Minimum URL score for an article candidate.
    pub min_score: i32,
    pub request_timeout_secs: u64,
    /// Sources fetched at the same time; clamped to `max_sources`.
    pub concurrency: usize,
    pub user_agent: String,
    /// Added to the built-in domain allow-list.
    pub extra_allowed_domains: Vec<String>,
    /// Whole-batch deadline; sources still running when it passes fail.
    pub batch_deadline_secs: Option<u64>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            max_sources: 5,
            max_headlines_per_source: 10,
            max_discovered_headlines: 15,
            broaden_below: 3,
            min_score: 1,
            request_timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            concurrency: 5,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            extra_allowed_domains: Vec::new(),
            batch_deadline_secs: None,
        }
    }
}

impl ScraperConfig {
    /// Parse a YAML document and validate it.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: ScraperConfig = if yaml.trim().is_empty() {
            ScraperConfig::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.display().to_string(),
                source,
            })?;
        let config = Self::from_yaml(&yaml)?;
        info!(?config, "Loaded scraper configuration");
        Ok(config)
    }

    /// Check the limits are usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field if:
    /// - any cap, the concurrency or the request timeout is zero
    /// - `batch_deadline_secs` is set to zero
    /// - `user_agent` is blank
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("max_sources", self.max_sources),
            ("max_headlines_per_source", self.max_headlines_per_source),
            ("max_discovered_headlines", self.max_discovered_headlines),
            ("concurrency", self.concurrency),
            ("request_timeout_secs", self.request_timeout_secs as usize),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be greater than zero".into(),
                });
            }
        }
        if self.batch_deadline_secs == Some(0) {
            return Err(ConfigError::Invalid {
                field: "batch_deadline_secs",
                reason: "must be greater than zero when set".into(),
            });
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "user_agent",
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    pub fn discovery_options(&self) -> DiscoveryOptions {
        DiscoveryOptions {
            max_headlines: self.max_discovered_headlines,
            broaden_below: self.broaden_below,
            min_score: self.min_score,
        }
    }

    pub fn allow_list(&self) -> DomainAllowList {
        DomainAllowList::builtin_with(&self.extra_allowed_domains)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn batch_deadline(&self) -> Option<Duration> {
        self.batch_deadline_secs.map(Duration::from_secs)
    }

    /// Fan-out width: never wider than a batch.
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.clamp(1, self.max_sources.max(1))
    }
}
