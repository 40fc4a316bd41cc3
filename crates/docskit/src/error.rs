//! Error types for DocsKit

use thiserror::Error;

/// Errors surfaced to the caller of a documentation lookup
#[derive(Debug, Error)]
pub enum DocsError {
    /// Library is not present in the registry
    #[error("Library {library} not supported. Supported libraries are: {}", .supported.join(", "))]
    UnsupportedLibrary {
        /// Identifier the caller asked for
        library: String,
        /// Every registered identifier, in registry order
        supported: Vec<String>,
    },

    /// Registry configuration could not be parsed
    #[error("Invalid library registry: {0}")]
    InvalidRegistry(String),

    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuildError(#[source] reqwest::Error),

    /// Search API answered with a non-success status
    #[error("Search request failed with HTTP status {status}")]
    SearchStatus {
        /// HTTP status code
        status: u16,
    },

    /// Search API could not be reached
    #[error("Search request failed: {0}")]
    SearchRequest(String),

    /// Search API response body was not the expected JSON
    #[error("Invalid search response: {0}")]
    SearchDecode(String),
}

impl DocsError {
    /// Create a search error from a non-timeout reqwest error
    pub fn from_search_reqwest(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            DocsError::SearchStatus {
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            DocsError::SearchDecode(err.to_string())
        } else {
            DocsError::SearchRequest(err.to_string())
        }
    }
}

/// Errors that can occur while fetching a single documentation page
///
/// These never reach the caller: the pipeline turns them into a sentinel
/// or an empty string for the affected page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// URL is not an http(s) URL
    #[error("Invalid URL: must start with http:// or https://")]
    InvalidUrlScheme,

    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuildError(#[source] reqwest::Error),

    /// Request exceeded the page timeout
    #[error("Request timed out")]
    Timeout,

    /// Response is not textual content
    #[error("Unsupported content type: {0}")]
    NotHtml(String),

    /// Other request error
    #[error("Request failed: {0}")]
    Request(String),
}

impl FetchError {
    /// Create an error from a reqwest error
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Request(err.to_string())
        }
    }
}
