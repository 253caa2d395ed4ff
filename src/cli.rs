//! Command-line interface definitions for headline_scout.
//!
//! Every option can also come from an environment variable.

use clap::Parser;
use std::path::PathBuf;

/// Discover current headlines from a batch of news sources and write the
/// brief payload as JSON.
///
/// ```sh
/// # Five shuffled US technology outlets
/// headline_scout --topic technology --country usa -j ./briefs
///
/// # Explicit sources, bypassing the catalog
/// headline_scout -u https://arstechnica.com -u https://www.theverge.com -j ./briefs
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Topic to brief on (`all` for every topic)
    #[arg(short, long, env = "SCOUT_TOPIC", default_value = "technology")]
    pub topic: String,

    /// Country to draw sources from (`global` for USA, UK and Canada)
    #[arg(short = 'n', long, env = "SCOUT_COUNTRY", default_value = "usa")]
    pub country: String,

    /// Scrape these URLs instead of catalog sources (repeatable)
    #[arg(short, long = "url", value_name = "URL")]
    pub urls: Vec<String>,

    /// Output directory for the JSON report
    #[arg(short, long, env = "SCOUT_JSON_OUTPUT_DIR")]
    pub json_output_dir: PathBuf,

    /// Optional path to config.yaml file
    #[arg(short, long, env = "SCOUT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Optional source catalog YAML replacing the bundled one
    #[arg(long, env = "SCOUT_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Abort sources still running after this many seconds
    #[arg(long, env = "SCOUT_DEADLINE_SECS")]
    pub deadline_secs: Option<u64>,
}
