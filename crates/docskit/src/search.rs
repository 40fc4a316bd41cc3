//! Web search client
//!
//! Sends a single domain-scoped query to the Serper search API and returns
//! the organic results in relevance order. A timeout is not an error: it
//! degrades to an empty result set.

use crate::error::DocsError;
use crate::types::{SearchRequest, SearchResponse, SearchResult};
use crate::DEFAULT_USER_AGENT;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use std::time::Duration;
use tracing::{debug, warn};

/// Serper search endpoint
pub const SERPER_ENDPOINT: &str = "https://google.serper.dev/search";

/// Number of results requested per search
pub const DEFAULT_NUM_RESULTS: usize = 2;

/// Search request timeout
pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(30);

const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-key");

/// Trait for web search backends
#[async_trait]
pub trait Searcher: Send + Sync {
    /// Identifier for logging
    fn name(&self) -> &'static str;

    /// Run a search and return its results in relevance order
    ///
    /// Returns an empty vector when the search timed out.
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, DocsError>;
}

/// Serper (Google search) API client
#[derive(Clone)]
pub struct SerperClient {
    api_key: String,
    endpoint: String,
    user_agent: String,
    num_results: usize,
    timeout: Duration,
}

impl std::fmt::Debug for SerperClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerperClient")
            .field("endpoint", &self.endpoint)
            .field("user_agent", &self.user_agent)
            .field("num_results", &self.num_results)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl SerperClient {
    /// Create a client for the public Serper endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: SERPER_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            num_results: DEFAULT_NUM_RESULTS,
            timeout: SEARCH_TIMEOUT,
        }
    }

    /// Use a different search endpoint
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the User-Agent sent with search requests
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }

    /// Set the number of results requested
    pub fn num_results(mut self, num: usize) -> Self {
        self.num_results = num;
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT)),
        );
        match HeaderValue::from_str(&self.api_key) {
            Ok(mut value) => {
                value.set_sensitive(true);
                headers.insert(API_KEY_HEADER, value);
            }
            Err(_) => warn!("Search API key is not a valid header value, sending without it"),
        }
        headers
    }
}

#[async_trait]
impl Searcher for SerperClient {
    fn name(&self) -> &'static str {
        "serper"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, DocsError> {
        let client = reqwest::Client::builder()
            .default_headers(self.headers())
            .timeout(self.timeout)
            .build()
            .map_err(DocsError::ClientBuildError)?;

        let body = SearchRequest {
            q: query,
            num: self.num_results,
        };

        debug!(endpoint = %self.endpoint, query, "Sending search request");

        let result: Result<SearchResponse, reqwest::Error> = async {
            let response = client
                .post(&self.endpoint)
                .json(&body)
                .send()
                .await?
                .error_for_status()?;
            response.json::<SearchResponse>().await
        }
        .await;

        match result {
            Ok(response) => {
                debug!(count = response.organic.len(), "Search returned results");
                Ok(response.organic)
            }
            Err(e) if e.is_timeout() => {
                warn!(query, "Timeout occurred while searching the web");
                Ok(Vec::new())
            }
            Err(e) => Err(DocsError::from_search_reqwest(e)),
        }
    }
}
