//! Default HTTP page fetcher
//!
//! Issues one GET per page, rejects binary content and extracts the text of
//! the page's main content region.

use crate::error::FetchError;
use crate::extract::{extract_with_strategies, ContentStrategy, DEFAULT_STRATEGIES};
use crate::fetchers::Fetcher;
use crate::DEFAULT_USER_AGENT;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Binary content type prefixes
const BINARY_PREFIXES: &[&str] = &[
    "image/",
    "audio/",
    "video/",
    "application/octet-stream",
    "application/pdf",
    "application/zip",
    "application/gzip",
    "application/x-tar",
    "application/x-rar",
    "application/x-7z",
    "application/vnd.ms-",
    "application/vnd.openxmlformats",
    "font/",
];

/// Page request timeout (connect, headers and body)
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP fetcher for documentation pages
#[derive(Debug, Clone)]
pub struct DefaultFetcher {
    user_agent: String,
    timeout: Duration,
    strategies: Vec<ContentStrategy>,
}

impl DefaultFetcher {
    /// Create a fetcher with the default User-Agent, timeout and strategies
    pub fn new() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: FETCH_TIMEOUT,
            strategies: DEFAULT_STRATEGIES.to_vec(),
        }
    }

    /// Set the User-Agent sent with page requests
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the content selection strategies
    pub fn strategies(mut self, strategies: Vec<ContentStrategy>) -> Self {
        self.strategies = strategies;
        self
    }
}

impl Default for DefaultFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for DefaultFetcher {
    fn name(&self) -> &'static str {
        "default"
    }

    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let parsed = Url::parse(url).map_err(|_| FetchError::InvalidUrlScheme)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrlScheme);
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT)),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html, application/xhtml+xml, */*;q=0.8"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(self.timeout)
            .build()
            .map_err(FetchError::ClientBuildError)?;

        let response = client
            .get(parsed)
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        debug!(url, status = status.as_u16(), content_type = ?content_type, "Fetched page");

        if let Some(ct) = content_type {
            if is_binary_content_type(&ct) {
                return Err(FetchError::NotHtml(ct));
            }
        }

        let body = response.bytes().await.map_err(FetchError::from_reqwest)?;
        let html = String::from_utf8_lossy(&body);

        Ok(extract_with_strategies(&html, &self.strategies))
    }
}

/// Check if content type indicates binary content
fn is_binary_content_type(content_type: &str) -> bool {
    let ct_lower = content_type.to_lowercase();
    BINARY_PREFIXES
        .iter()
        .any(|prefix| ct_lower.starts_with(prefix))
}
