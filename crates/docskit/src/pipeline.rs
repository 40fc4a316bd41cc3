//! Retrieval pipeline
//!
//! Registry lookup, one scoped search, one fetch per result, then
//! concatenation in result order and a character-count cut.

use crate::error::DocsError;
use crate::fetchers::Fetcher;
use crate::registry::LibraryRegistry;
use crate::search::Searcher;
use futures::future::join_all;
use std::sync::Arc;
use tracing::debug;

/// Returned when the search yields no results
pub const NO_RESULTS_MESSAGE: &str = "No results found.";

/// How the pages of one lookup are fetched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchMode {
    /// All pages at once; output order still follows the search results
    #[default]
    Concurrent,
    /// One page after another
    Sequential,
}

/// Documentation lookup pipeline
#[derive(Clone)]
pub struct DocsPipeline {
    registry: Arc<LibraryRegistry>,
    searcher: Arc<dyn Searcher>,
    fetcher: Arc<dyn Fetcher>,
    fetch_mode: FetchMode,
}

impl DocsPipeline {
    /// Create a pipeline from its collaborators
    pub fn new(
        registry: LibraryRegistry,
        searcher: Arc<dyn Searcher>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            searcher,
            fetcher,
            fetch_mode: FetchMode::default(),
        }
    }

    /// Set how result pages are fetched
    pub fn fetch_mode(mut self, mode: FetchMode) -> Self {
        self.fetch_mode = mode;
        self
    }

    /// Registry this pipeline resolves libraries against
    pub fn registry(&self) -> &LibraryRegistry {
        &self.registry
    }

    /// Look up `query` in the documentation of `library`
    ///
    /// Returns at most `max_chars` characters of the concatenated page texts,
    /// or [`NO_RESULTS_MESSAGE`] when the search finds nothing. Fails only
    /// for an unknown library (before any network call) or a search
    /// transport error.
    pub async fn retrieve_docs(
        &self,
        query: &str,
        library: &str,
        max_chars: i64,
    ) -> Result<String, DocsError> {
        let domain = self.registry.resolve(library)?;
        let scoped_query = scoped_query(domain, query);

        debug!(searcher = self.searcher.name(), query = %scoped_query, "Searching docs");
        let results = self.searcher.search(&scoped_query).await?;

        if results.is_empty() {
            return Ok(NO_RESULTS_MESSAGE.to_string());
        }

        let pages = match self.fetch_mode {
            FetchMode::Concurrent => {
                join_all(results.iter().map(|r| self.fetcher.fetch_text(&r.link))).await
            }
            FetchMode::Sequential => {
                let mut pages = Vec::with_capacity(results.len());
                for result in &results {
                    pages.push(self.fetcher.fetch_text(&result.link).await);
                }
                pages
            }
        };

        Ok(truncate_chars(&pages.concat(), max_chars))
    }
}

/// Restrict a query to a documentation domain
pub fn scoped_query(domain: &str, query: &str) -> String {
    format!("site:{domain} {query}")
}

/// First `max_chars` characters of `text`; empty for `max_chars <= 0`
pub fn truncate_chars(text: &str, max_chars: i64) -> String {
    let Ok(max) = usize::try_from(max_chars) else {
        return String::new();
    };
    match text.char_indices().nth(max) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}
