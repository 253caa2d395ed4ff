//! JSON output for the summarizer handoff.
//!
//! Reports are grouped by the local date they were generated on, one file per
//! topic, country and edition:
//! `{json_output_dir}/{date}/{topic}-{country}-{time_of_day}.json`.
//! A rerun in the same edition overwrites the earlier file.

use crate::pipeline::BriefReport;
use crate::utils::slugify_title;
use chrono::Local;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Where `report` lands under `json_output_dir`.
pub fn report_path(report: &BriefReport, json_output_dir: impl AsRef<Path>) -> PathBuf {
    let date = report.generated_at.with_timezone(&Local).date_naive();
    let file = format!(
        "{}-{}-{}.json",
        slugify_title(&report.topic),
        slugify_title(&report.country),
        report.time_of_day
    );
    json_output_dir.as_ref().join(date.to_string()).join(file)
}

/// Serialize `report` as pretty JSON and write it, returning the path written.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir.as_ref().display()))]
pub async fn write_report(
    report: &BriefReport,
    json_output_dir: impl AsRef<Path>,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)?;
    let path = report_path(report, &json_output_dir);

    if let Some(dir) = path.parent() {
        info!(dir = %dir.display(), "Ensuring JSON directory exists");
        if let Err(e) = fs::create_dir_all(dir).await {
            error!(dir = %dir.display(), error = %e, "Failed to create JSON dir");
            return Err(e.into());
        }
    }

    fs::write(&path, json).await?;
    info!(path = %path.display(), total_headlines = report.total_headlines, "Wrote JSON report");
    Ok(path)
}
