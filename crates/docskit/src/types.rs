//! Core types for DocsKit

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default upper bound on returned characters
pub const DEFAULT_MAX_CHARS: i64 = 1000;

fn default_max_chars() -> i64 {
    DEFAULT_MAX_CHARS
}

/// Arguments of the `get_docs` tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DocsRequest {
    /// The query to search for (e.g. "Chroma DB")
    pub query: String,

    /// The library whose documentation is searched (e.g. "langchain")
    pub library: String,

    /// Maximum characters to return (default 1000)
    #[serde(default = "default_max_chars")]
    #[schemars(range(min = 0))]
    pub max_chars: i64,
}

impl DocsRequest {
    /// Create a request with the default character bound
    pub fn new(query: impl Into<String>, library: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            library: library.into(),
            max_chars: DEFAULT_MAX_CHARS,
        }
    }

    /// Set the character bound
    pub fn max_chars(mut self, max_chars: i64) -> Self {
        self.max_chars = max_chars;
        self
    }
}

/// Body sent to the search API
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SearchRequest<'a> {
    pub q: &'a str,
    pub num: usize,
}

/// One organic entry returned by the search API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Target URL of the result
    pub link: String,

    /// Page title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Search engine snippet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,

    /// 1-based rank reported by the API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

impl SearchResult {
    /// Create a result pointing at the given URL
    pub fn new(link: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            ..Default::default()
        }
    }
}

/// Search API response; only the organic results are used
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub organic: Vec<SearchResult>,
}
