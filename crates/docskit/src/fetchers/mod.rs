//! Page fetchers
//!
//! A fetcher turns one search-result URL into readable text. Failures stay
//! local to that page: [`Fetcher::fetch_text`] replaces them with a sentinel
//! or an empty string so the other pages of a lookup are unaffected.

mod default;

pub use default::DefaultFetcher;

use crate::error::FetchError;
use async_trait::async_trait;
use tracing::warn;

/// Text used in place of a page whose fetch timed out
pub const FETCH_TIMEOUT_MESSAGE: &str = "Timeout occurred while fetching the URL.";

/// Trait for documentation page fetchers
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Unique identifier for this fetcher (for logging/debugging)
    fn name(&self) -> &'static str;

    /// Fetch a page and extract its readable text
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;

    /// Fetch a page, degrading any failure to a placeholder
    ///
    /// Timeouts yield [`FETCH_TIMEOUT_MESSAGE`]; every other error yields
    /// an empty string.
    async fn fetch_text(&self, url: &str) -> String {
        match self.fetch(url).await {
            Ok(text) => text,
            Err(FetchError::Timeout) => {
                warn!(fetcher = self.name(), url, "Timeout occurred while fetching the URL");
                FETCH_TIMEOUT_MESSAGE.to_string()
            }
            Err(e) => {
                warn!(fetcher = self.name(), url, error = %e, "Skipping page");
                String::new()
            }
        }
    }
}
