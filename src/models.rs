//! Data models shared by the discovery engine, the orchestrator and the outputs.
//!
//! - [`Source`]: a catalog entry describing one news homepage
//! - [`HeadlineCandidate`]: a headline/URL pair discovered on a page
//! - [`ScrapeOutcome`]: everything one fetch + discovery produced for a source
//! - [`SourceNewsData`]: the part of a successful outcome handed to summarization
//! - [`SourceResult`]: the per-source audit record surfaced to the caller
//!
//! JSON field names are camelCase to match the payloads the API layer and the
//! browser client already consume.

use serde::{Deserialize, Serialize};

/// A news source from the static catalog.
///
/// Identity is the `url`; entries are read-only once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    /// Display name, e.g. "Ars Technica".
    pub name: String,
    /// Homepage or section URL that gets scraped.
    pub url: String,
    /// Whether the outlet counts as a major outlet for the summarizer.
    #[serde(default)]
    pub is_major_outlet: bool,
}

impl Source {
    pub fn new(name: impl Into<String>, url: impl Into<String>, is_major_outlet: bool) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            is_major_outlet,
        }
    }
}

/// A headline discovered on one page, paired with its absolute article URL.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadlineCandidate {
    pub title: String,
    pub url: String,
}

impl HeadlineCandidate {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// The result of scraping a single source.
///
/// Always produced, including on failure, so a broken source never aborts a
/// batch. Headlines keep discovery order (selector priority, then document
/// order) and are not sorted by score.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeOutcome {
    pub success: bool,
    pub title: Option<String>,
    pub headlines: Vec<HeadlineCandidate>,
    pub content: String,
    pub error: Option<String>,
}

impl ScrapeOutcome {
    /// A successful scrape.
    pub fn success(title: String, headlines: Vec<HeadlineCandidate>, content: String) -> Self {
        Self {
            success: true,
            title: Some(title),
            headlines,
            content,
            error: None,
        }
    }

    /// A failure-shaped outcome carrying the error message.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            title: None,
            headlines: Vec::new(),
            content: String::new(),
            error: Some(error.into()),
        }
    }
}

/// The slice of a successful scrape carried forward to the summarizer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceNewsData {
    pub name: String,
    pub url: String,
    pub is_major_outlet: bool,
    pub headlines: Vec<HeadlineCandidate>,
    pub content: String,
}

/// Audit record for one attempted source, produced whether or not it succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceResult {
    pub url: String,
    pub name: String,
    pub success: bool,
    pub headlines_found: usize,
    pub is_major_outlet: bool,
    pub error: Option<String>,
}

impl SourceResult {
    pub fn succeeded(source: &Source, headlines_found: usize) -> Self {
        Self {
            url: source.url.clone(),
            name: source.name.clone(),
            success: true,
            headlines_found,
            is_major_outlet: source.is_major_outlet,
            error: None,
        }
    }

    pub fn failed(source: &Source, error: impl Into<String>) -> Self {
        Self {
            url: source.url.clone(),
            name: source.name.clone(),
            success: false,
            headlines_found: 0,
            is_major_outlet: source.is_major_outlet,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_deserializes_without_major_flag() {
        let yaml = "name: Grist\nurl: https://grist.org\n";
        let source: Source = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(source.name, "Grist");
        assert!(!source.is_major_outlet);
    }

    #[test]
    fn test_scrape_outcome_failure_shape() {
        let outcome = ScrapeOutcome::failure("HTTP 503 Service Unavailable");
        assert!(!outcome.success);
        assert!(outcome.headlines.is_empty());
        assert!(outcome.content.is_empty());
        assert_eq!(outcome.error.as_deref(), Some("HTTP 503 Service Unavailable"));
    }

    #[test]
    fn test_source_result_serializes_camel_case() {
        let source = Source::new("The Hill", "https://thehill.com", true);
        let result = SourceResult::succeeded(&source, 7);

        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"headlinesFound\":7"));
        assert!(json.contains("\"isMajorOutlet\":true"));
        assert!(json.contains("\"error\":null"));
    }

    #[test]
    fn test_failed_source_result_reports_zero_headlines() {
        let source = Source::new("Kotaku", "https://kotaku.com", false);
        let result = SourceResult::failed(&source, "timed out");
        assert!(!result.success);
        assert_eq!(result.headlines_found, 0);
        assert_eq!(result.error.as_deref(), Some("timed out"));
    }
}
