//! `headline_scout` binary: run one brief batch and write the JSON report.
//!
//! ```sh
//! headline_scout --topic science --country uk -j ./briefs
//! RUST_LOG=headline_scout=debug headline_scout -u https://arstechnica.com -j ./briefs
//! ```

use clap::Parser;
use headline_scout::outputs::json;
use headline_scout::utils::ensure_writable_dir;
use headline_scout::{BriefPipeline, Orchestrator, ScraperConfig, Source, StaticCatalog};
use std::error::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};
use url::Url;

mod cli;

use cli::Cli;

/// Sources named on the command line; the host doubles as the display name.
fn sources_from_urls(urls: &[String]) -> Vec<Source> {
    urls.iter()
        .map(|raw| {
            let name = Url::parse(raw)
                .ok()
                .and_then(|u| u.host_str().map(str::to_string))
                .unwrap_or_else(|| raw.clone());
            Source::new(name, raw.clone(), false)
        })
        .collect()
}

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("headline_scout starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // Early check: ensure JSON output dir is writable
    if let Err(e) = ensure_writable_dir(&args.json_output_dir).await {
        error!(
            path = %args.json_output_dir.display(),
            error = %e,
            "JSON output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e.into());
    }

    let mut config = match &args.config {
        Some(path) => ScraperConfig::load(path).await?,
        None => ScraperConfig::default(),
    };
    if let Some(secs) = args.deadline_secs {
        config.batch_deadline_secs = Some(secs);
        config.validate()?;
    }

    let catalog = match &args.catalog {
        Some(path) => StaticCatalog::load(path).await?,
        None => StaticCatalog::builtin()?,
    }
    .with_batch_size(config.max_sources);

    let pipeline = BriefPipeline::new(catalog, Orchestrator::from_config(&config)?);

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received; cancelling in-flight sources");
            on_signal.cancel();
        }
    });

    let outcome = if args.urls.is_empty() {
        pipeline
            .run_with_cancel(&args.topic, &args.country, &cancel)
            .await
    } else {
        let sources = sources_from_urls(&args.urls);
        info!(count = sources.len(), "Using sources from the command line");
        pipeline
            .run_sources(&args.topic, &args.country, &sources, &cancel)
            .await
    };

    let report = match outcome {
        Ok(report) => report,
        Err(e) => {
            for result in e.results() {
                warn!(source = %result.name, url = %result.url, error = ?result.error, "Source failed");
            }
            error!(error = %e, "Brief batch failed");
            return Err(e.into());
        }
    };

    for result in &report.results {
        if result.success {
            info!(source = %result.name, headlines = result.headlines_found, "Source succeeded");
        } else {
            warn!(source = %result.name, error = ?result.error, "Source failed");
        }
    }

    let path = json::write_report(&report, &args.json_output_dir).await?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        path = %path.display(),
        total_headlines = report.total_headlines,
        "Execution complete"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_from_urls_named_by_host() {
        let sources = sources_from_urls(&[
            "https://www.theverge.com/tech".to_string(),
            "not a url".to_string(),
        ]);
        assert_eq!(sources[0].name, "www.theverge.com");
        assert_eq!(sources[0].url, "https://www.theverge.com/tech");
        assert!(!sources[0].is_major_outlet);
        assert_eq!(sources[1].name, "not a url");
    }
}
