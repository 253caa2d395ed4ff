//! # headline_scout
//!
//! Headline discovery for news briefs. Given a batch of news homepages, fetch
//! each one, pick out the links that look like real articles, pair them with
//! readable headlines and a short plaintext digest, and hand the lot (plus a
//! per-source audit trail) to a downstream summarizer.
//!
//! ## Architecture
//!
//! 1. **Catalog**: pick up to five sources for a topic and country ([`catalog`])
//! 2. **Fetching**: GET every homepage concurrently ([`fetcher`], [`orchestrator`])
//! 3. **Discovery**: allow-list, score, title and dedup links ([`discovery`])
//! 4. **Output**: assemble a [`pipeline::BriefReport`] and write it as JSON ([`outputs`])
//!
//! ```no_run
//! use headline_scout::{BriefPipeline, Orchestrator, ScraperConfig, StaticCatalog};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ScraperConfig::default();
//! let catalog = StaticCatalog::builtin()?.with_batch_size(config.max_sources);
//! let pipeline = BriefPipeline::new(catalog, Orchestrator::from_config(&config)?);
//! let report = pipeline.run("technology", "usa").await?;
//! println!("{} headlines", report.total_headlines);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod discovery;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod orchestrator;
pub mod outputs;
pub mod pipeline;
pub mod utils;

pub use catalog::{SourceCatalog, StaticCatalog};
pub use config::ScraperConfig;
pub use discovery::{Discovery, DiscoveryEngine, DiscoveryOptions};
pub use error::{BatchError, ConfigError, FetchError, ScrapeError};
pub use fetcher::{HttpFetcher, PageFetcher};
pub use models::{HeadlineCandidate, ScrapeOutcome, Source, SourceNewsData, SourceResult};
pub use orchestrator::{BatchLimits, Orchestrator, ScrapeBatch};
pub use pipeline::{BriefPipeline, BriefReport};
