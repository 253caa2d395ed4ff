//! Catalog → orchestrator glue producing the summarizer handoff.

use crate::catalog::SourceCatalog;
use crate::error::BatchError;
use crate::fetcher::PageFetcher;
use crate::models::{Source, SourceNewsData, SourceResult};
use crate::orchestrator::Orchestrator;
use crate::utils::time_of_day;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument};

/// Everything the summarizer needs for one brief, plus the per-source audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BriefReport {
    pub topic: String,
    pub country: String,
    pub generated_at: DateTime<Utc>,
    /// Edition name: morning, afternoon or evening.
    pub time_of_day: String,
    pub total_headlines: usize,
    pub news: Vec<SourceNewsData>,
    pub results: Vec<SourceResult>,
}

#[derive(Debug)]
pub struct BriefPipeline<C, F> {
    catalog: C,
    orchestrator: Orchestrator<F>,
}

impl<C: SourceCatalog, F: PageFetcher> BriefPipeline<C, F> {
    pub fn new(catalog: C, orchestrator: Orchestrator<F>) -> Self {
        Self {
            catalog,
            orchestrator,
        }
    }

    pub async fn run(&self, topic: &str, country: &str) -> Result<BriefReport, BatchError> {
        self.run_with_cancel(topic, country, &CancellationToken::new())
            .await
    }

    /// Look up sources for `topic`/`country` and scrape them.
    #[instrument(level = "info", skip(self, cancel))]
    pub async fn run_with_cancel(
        &self,
        topic: &str,
        country: &str,
        cancel: &CancellationToken,
    ) -> Result<BriefReport, BatchError> {
        let sources = self.catalog.sources_for(topic, country);
        if sources.is_empty() {
            error!("Catalog returned no sources");
            return Err(BatchError::NoSources {
                topic: topic.to_string(),
                country: country.to_string(),
            });
        }
        self.run_sources(topic, country, &sources, cancel).await
    }

    /// Scrape an explicit source list, bypassing the catalog.
    #[instrument(level = "info", skip_all, fields(%topic, %country, sources = sources.len()))]
    pub async fn run_sources(
        &self,
        topic: &str,
        country: &str,
        sources: &[Source],
        cancel: &CancellationToken,
    ) -> Result<BriefReport, BatchError> {
        if sources.is_empty() {
            return Err(BatchError::NoSources {
                topic: topic.to_string(),
                country: country.to_string(),
            });
        }

        let batch = self
            .orchestrator
            .run_with_cancel(sources, cancel)
            .await
            .into_result()
            .inspect_err(|e| error!(error = %e, "No source produced content"))?;

        let report = BriefReport {
            topic: topic.to_string(),
            country: country.to_string(),
            generated_at: Utc::now(),
            time_of_day: time_of_day(),
            total_headlines: batch.total_headlines(),
            news: batch.news,
            results: batch.results,
        };
        info!(
            sources_with_news = report.news.len(),
            total_headlines = report.total_headlines,
            "Brief payload ready"
        );
        Ok(report)
    }
}
