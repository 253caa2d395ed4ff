//! HTTP fetching of source homepages.
//!
//! [`PageFetcher`] is the seam the orchestrator depends on; [`HttpFetcher`] is
//! the production implementation backed by one pooled `reqwest::Client`.

use crate::error::FetchError;
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, UPGRADE_INSECURE_REQUESTS};
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Browser-like User-Agent; several outlets serve bots an empty shell page.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Something that can turn a URL into raw HTML.
pub trait PageFetcher {
    /// GET `url` and return the body of a 2xx response.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// `reqwest`-backed fetcher with browser-like default headers.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

        let client = Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout { url: url.to_string() }
            } else {
                FetchError::Transport(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, elapsed_ms = t0.elapsed().as_millis() as u64, "non-success status");
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }

        let body = response.text().await.map_err(FetchError::Body)?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "fetched page"
        );
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_with_defaults() {
        assert!(HttpFetcher::new(DEFAULT_USER_AGENT, DEFAULT_TIMEOUT).is_ok());
    }

    #[test]
    fn test_status_error_message() {
        let err = FetchError::Status {
            status: reqwest::StatusCode::FORBIDDEN,
            url: "https://example.com".into(),
        };
        assert_eq!(err.to_string(), "HTTP 403 Forbidden for https://example.com");
    }

    #[tokio::test]
    async fn test_unparseable_url_fails_before_any_request() {
        let fetcher = HttpFetcher::new(DEFAULT_USER_AGENT, Duration::from_millis(200)).unwrap();
        let err = fetcher.fetch("not a url").await.unwrap_err();
        match err {
            FetchError::Transport(e) => assert!(e.is_builder()),
            other => panic!("expected transport error, got {other:?}"),
        }
    }
}
