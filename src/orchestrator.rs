//! Multi-source orchestration: fetch + discover every source in a batch.
//!
//! Each source is an independent unit of work. Sources run with bounded
//! concurrency (`buffer_unordered`), every result lands in the slot of its
//! input index, and the final lists are assembled in input order regardless
//! of completion order. A failing, cancelled or timed-out source only ever
//! produces a failed [`SourceResult`]; it never aborts its siblings.

use crate::config::ScraperConfig;
use crate::discovery::DiscoveryEngine;
use crate::error::{BatchError, FetchError, ScrapeError};
use crate::fetcher::{HttpFetcher, PageFetcher};
use crate::models::{ScrapeOutcome, Source, SourceNewsData, SourceResult};
use crate::utils::truncate_for_log;
use futures::stream::{self, StreamExt};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Volume and concurrency limits for one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchLimits {
    pub max_sources: usize,
    pub max_headlines_per_source: usize,
    pub concurrency: usize,
    pub deadline: Option<Duration>,
}

impl Default for BatchLimits {
    fn default() -> Self {
        Self::from(&ScraperConfig::default())
    }
}

impl From<&ScraperConfig> for BatchLimits {
    fn from(config: &ScraperConfig) -> Self {
        Self {
            max_sources: config.max_sources,
            max_headlines_per_source: config.max_headlines_per_source,
            concurrency: config.effective_concurrency(),
            deadline: config.batch_deadline(),
        }
    }
}

/// The two outputs of a batch: summarizer input and the audit trail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeBatch {
    pub news: Vec<SourceNewsData>,
    pub results: Vec<SourceResult>,
}

impl ScrapeBatch {
    /// A batch succeeds when at least one source contributed data.
    pub fn is_success(&self) -> bool {
        !self.news.is_empty()
    }

    /// Headlines carried forward across all sources.
    pub fn total_headlines(&self) -> usize {
        self.news.iter().map(|n| n.headlines.len()).sum()
    }

    pub fn failed_sources(&self) -> usize {
        self.results.iter().filter(|r| !r.success).count()
    }

    /// Escalate an all-failed batch to a [`BatchError`] carrying every result.
    pub fn into_result(self) -> Result<ScrapeBatch, BatchError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(BatchError::NoContent {
                results: self.results,
            })
        }
    }
}

type SlotEntry = (Option<SourceNewsData>, SourceResult);

/// Runs fetch → discovery for a batch of sources.
#[derive(Debug)]
pub struct Orchestrator<F> {
    fetcher: F,
    engine: DiscoveryEngine,
    limits: BatchLimits,
}

impl Orchestrator<HttpFetcher> {
    /// Production orchestrator wired from configuration.
    pub fn from_config(config: &ScraperConfig) -> Result<Self, FetchError> {
        let fetcher = HttpFetcher::new(&config.user_agent, config.request_timeout())?;
        let engine = DiscoveryEngine::new(config.allow_list(), config.discovery_options());
        Ok(Self::new(fetcher, engine, BatchLimits::from(config)))
    }
}

impl<F: PageFetcher> Orchestrator<F> {
    /// Assemble an orchestrator from its parts.
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Turns source URLs into HTML; tests pass an in-memory fake
    /// * `engine` - Shared, read-only discovery configuration
    /// * `limits` - Batch cap, headline cap, fan-out width and optional deadline
    pub fn new(fetcher: F, engine: DiscoveryEngine, limits: BatchLimits) -> Self {
        Self {
            fetcher,
            engine,
            limits,
        }
    }

    /// Scrape every source (up to the batch cap) with no external cancellation.
    pub async fn run(&self, sources: &[Source]) -> ScrapeBatch {
        self.run_with_cancel(sources, &CancellationToken::new()).await
    }

    /// Scrape every source (up to the batch cap), honouring `cancel` and the
    /// configured batch deadline for every in-flight source.
    ///
    /// # Returns
    ///
    /// A [`ScrapeBatch`] with exactly one [`SourceResult`] per attempted source,
    /// in input order, and a [`SourceNewsData`] entry for each source that
    /// produced headlines. Use [`ScrapeBatch::into_result`] to turn an
    /// all-failed batch into a [`BatchError`].
    #[instrument(level = "info", skip_all, fields(sources = sources.len()))]
    pub async fn run_with_cancel(&self, sources: &[Source], cancel: &CancellationToken) -> ScrapeBatch {
        let batch = &sources[..sources.len().min(self.limits.max_sources)];
        if batch.len() < sources.len() {
            debug!(ignored = sources.len() - batch.len(), "sources beyond batch cap ignored");
        }
        let deadline = self.limits.deadline.map(|d| Instant::now() + d);
        let width = self.limits.concurrency.max(1);

        let mut slots: Vec<Option<SlotEntry>> = (0..batch.len()).map(|_| None).collect();
        let mut completed = stream::iter(batch.iter().enumerate())
            .map(|(index, source)| async move {
                let outcome = self.scrape_guarded(source, cancel, deadline).await;
                (index, self.record(source, outcome))
            })
            .buffer_unordered(width);

        while let Some((index, entry)) = completed.next().await {
            slots[index] = Some(entry);
        }

        let mut out = ScrapeBatch::default();
        for (news, result) in slots.into_iter().flatten() {
            out.news.extend(news);
            out.results.push(result);
        }

        info!(
            attempted = out.results.len(),
            successful = out.news.len(),
            failed = out.failed_sources(),
            total_headlines = out.total_headlines(),
            "Completed source batch"
        );
        out
    }

    /// Fetch one source and run discovery on its HTML.
    ///
    /// Never fails: every error becomes a failure-shaped [`ScrapeOutcome`].
    #[instrument(level = "info", skip_all, fields(source = %source.name, url = %source.url))]
    pub async fn scrape_source(&self, source: &Source) -> ScrapeOutcome {
        match self.try_scrape(source).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "source scrape failed");
                ScrapeOutcome::failure(e.to_string())
            }
        }
    }

    async fn try_scrape(&self, source: &Source) -> Result<ScrapeOutcome, ScrapeError> {
        let base = Url::parse(&source.url).map_err(|e| ScrapeError::InvalidUrl {
            url: source.url.clone(),
            source: e,
        })?;
        let html = self.fetcher.fetch(base.as_str()).await?;
        let discovery = self.engine.discover_html(&html, &base);
        info!(
            headlines = discovery.headlines.len(),
            content_chars = discovery.content.len(),
            title = %discovery.title,
            "Discovered headlines"
        );
        debug!(preview = %truncate_for_log(&discovery.content, 160), "Content digest");
        Ok(ScrapeOutcome::success(
            discovery.title,
            discovery.headlines,
            discovery.content,
        ))
    }

    async fn scrape_guarded(
        &self,
        source: &Source,
        cancel: &CancellationToken,
        deadline: Option<Instant>,
    ) -> ScrapeOutcome {
        let expired = async {
            match deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            outcome = self.scrape_source(source) => outcome,
            _ = cancel.cancelled() => {
                warn!(source = %source.name, "source cancelled");
                ScrapeOutcome::failure(FetchError::Cancelled.to_string())
            }
            _ = expired => {
                warn!(source = %source.name, "source hit batch deadline");
                ScrapeOutcome::failure(FetchError::DeadlineExceeded.to_string())
            }
        }
    }

    /// Turn an outcome into the audit record plus, on success, summarizer data.
    fn record(&self, source: &Source, outcome: ScrapeOutcome) -> SlotEntry {
        if !outcome.success {
            let error = outcome.error.unwrap_or_else(|| "unknown error".to_string());
            return (None, SourceResult::failed(source, error));
        }
        if outcome.headlines.is_empty() {
            return (None, SourceResult::failed(source, "no headlines found"));
        }

        let found = outcome.headlines.len();
        let mut headlines = outcome.headlines;
        headlines.truncate(self.limits.max_headlines_per_source);
        let news = SourceNewsData {
            name: source.name.clone(),
            url: source.url.clone(),
            is_major_outlet: source.is_major_outlet,
            headlines,
            content: outcome.content,
        };
        (Some(news), SourceResult::succeeded(source, found))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::DiscoveryOptions;
    use crate::discovery::allowlist::DomainAllowList;
    use std::collections::HashMap;

    /// Serves canned pages; unknown URLs answer 503.
    #[derive(Default)]
    struct FakeFetcher {
        pages: HashMap<String, String>,
        delays: HashMap<String, Duration>,
    }

    impl FakeFetcher {
        fn page(mut self, url: &str, html: String) -> Self {
            self.pages.insert(Url::parse(url).unwrap().to_string(), html);
            self
        }

        fn delay(mut self, url: &str, delay: Duration) -> Self {
            self.delays.insert(Url::parse(url).unwrap().to_string(), delay);
            self
        }
    }

    impl PageFetcher for FakeFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            if let Some(delay) = self.delays.get(url) {
                tokio::time::sleep(*delay).await;
            }
            self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                url: url.to_string(),
            })
        }
    }

    fn source(i: usize) -> Source {
        Source::new(format!("Source {i}"), format!("https://example.com/s{i}"), i == 1)
    }

    fn sources(n: usize) -> Vec<Source> {
        (1..=n).map(source).collect()
    }

    fn page_with(n: usize) -> String {
        let links: String = (0..n)
            .map(|i| {
                format!(
                    r#"<a href="/world/2024/06/{:02}/harbour-expansion-{i}">Harbour expansion plan reaches stage {i}</a>"#,
                    i % 28 + 1
                )
            })
            .collect();
        format!(
            "<html><head><title>Example</title></head><body><main>{links}\
             <p>Port officials outlined the timeline for the expansion work.</p></main></body></html>"
        )
    }

    fn orchestrator(fetcher: FakeFetcher, limits: BatchLimits) -> Orchestrator<FakeFetcher> {
        let engine = DiscoveryEngine::new(DomainAllowList::new(["example.com"]), DiscoveryOptions::default());
        Orchestrator::new(fetcher, engine, limits)
    }

    fn serving(ids: &[usize], headlines: usize) -> FakeFetcher {
        ids.iter().fold(FakeFetcher::default(), |f, i| {
            f.page(&source(*i).url, page_with(headlines))
        })
    }

    #[tokio::test]
    async fn test_batch_cap_and_partial_failure() {
        // sources 1 and 3 fail, 6 is beyond the cap
        let fetcher = serving(&[2, 4, 5, 6], 4);
        let batch = orchestrator(fetcher, BatchLimits::default()).run(&sources(6)).await;

        assert_eq!(batch.results.len(), 5);
        let names: Vec<_> = batch.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Source 1", "Source 2", "Source 3", "Source 4", "Source 5"]);

        let news: Vec<_> = batch.news.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(news, ["Source 2", "Source 4", "Source 5"]);

        assert!(!batch.results[0].success);
        assert!(batch.results[0].error.as_deref().unwrap().contains("503"));
        assert!(batch.results[1].success);
        assert_eq!(batch.results[1].headlines_found, 4);
        assert!(batch.is_success());
        assert_eq!(batch.total_headlines(), 12);
    }

    #[tokio::test]
    async fn test_all_failed_batch_is_escalated_with_audit_trail() {
        let batch = orchestrator(FakeFetcher::default(), BatchLimits::default())
            .run(&sources(3))
            .await;

        assert!(batch.news.is_empty());
        assert_eq!(batch.results.len(), 3);
        assert!(batch.results.iter().all(|r| !r.success && r.error.is_some()));

        let err = batch.into_result().unwrap_err();
        assert_eq!(err.results().len(), 3);
        assert!(matches!(err, BatchError::NoContent { .. }));
    }

    #[tokio::test]
    async fn test_order_preserved_regardless_of_completion() {
        let fetcher = serving(&[1, 2, 3, 4], 3)
            .delay(&source(1).url, Duration::from_millis(80))
            .delay(&source(2).url, Duration::from_millis(40))
            .delay(&source(3).url, Duration::from_millis(10));
        let batch = orchestrator(fetcher, BatchLimits::default()).run(&sources(4)).await;

        let urls: Vec<_> = batch.results.iter().map(|r| r.url.clone()).collect();
        let expected: Vec<_> = sources(4).into_iter().map(|s| s.url).collect();
        assert_eq!(urls, expected);
        let news_urls: Vec<_> = batch.news.iter().map(|n| n.url.clone()).collect();
        assert_eq!(news_urls, expected);
    }

    #[tokio::test]
    async fn test_headlines_capped_per_source() {
        let batch = orchestrator(serving(&[1], 20), BatchLimits::default())
            .run(&sources(1))
            .await;

        assert_eq!(batch.results[0].headlines_found, 15);
        assert_eq!(batch.news[0].headlines.len(), 10);
        assert_eq!(
            batch.news[0].content,
            "Port officials outlined the timeline for the expansion work."
        );
        assert!(batch.news[0].is_major_outlet);
    }

    #[tokio::test]
    async fn test_page_without_articles_uses_homepage_fallback() {
        let fetcher = FakeFetcher::default().page(
            &source(1).url,
            "<html><body><p>Under maintenance</p></body></html>".to_string(),
        );
        let batch = orchestrator(fetcher, BatchLimits::default()).run(&sources(1)).await;

        assert!(batch.results[0].success);
        assert_eq!(batch.results[0].headlines_found, 1);
        assert_eq!(batch.news[0].headlines[0].title, "Latest news from example.com");
        assert_eq!(batch.news[0].headlines[0].url, "https://example.com");
    }

    #[tokio::test]
    async fn test_cancelled_batch_reports_per_source_failures() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let fetcher = serving(&[1, 2], 3)
            .delay(&source(1).url, Duration::from_millis(200))
            .delay(&source(2).url, Duration::from_millis(200));
        let batch = orchestrator(fetcher, BatchLimits::default())
            .run_with_cancel(&sources(2), &cancel)
            .await;

        assert_eq!(batch.results.len(), 2);
        for result in &batch.results {
            assert!(!result.success);
            assert_eq!(result.error.as_deref(), Some("fetch cancelled"));
        }
    }

    #[tokio::test]
    async fn test_deadline_only_fails_slow_sources() {
        let fetcher = serving(&[1, 2], 3).delay(&source(2).url, Duration::from_secs(5));
        let limits = BatchLimits {
            deadline: Some(Duration::from_millis(100)),
            ..BatchLimits::default()
        };
        let batch = orchestrator(fetcher, limits).run(&sources(2)).await;

        assert!(batch.results[0].success);
        assert!(!batch.results[1].success);
        assert_eq!(batch.results[1].error.as_deref(), Some("batch deadline exceeded"));
        assert_eq!(batch.news.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_source_url_is_isolated() {
        let bad = Source::new("Broken", "not a url", false);
        let good = source(1);
        let batch = orchestrator(serving(&[1], 3), BatchLimits::default())
            .run(&[bad, good])
            .await;

        assert_eq!(batch.results.len(), 2);
        assert!(!batch.results[0].success);
        assert!(batch.results[0].error.as_deref().unwrap().starts_with("invalid source url"));
        assert!(batch.results[1].success);
    }

    #[tokio::test]
    async fn test_single_worker_still_completes_batch() {
        let limits = BatchLimits {
            concurrency: 1,
            ..BatchLimits::default()
        };
        let batch = orchestrator(serving(&[1, 2, 3], 3), limits).run(&sources(3)).await;
        assert_eq!(batch.news.len(), 3);
    }
}
