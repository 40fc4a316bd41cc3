//! Main-content text extraction
//!
//! A page is parsed as HTML and the first matching [`ContentStrategy`]
//! picks the region whose visible text is returned. Strategies are tried in
//! order, so new heuristics can be appended without touching the fetcher.

use scraper::{ElementRef, Html, Selector};

/// Separator placed between extracted text nodes
pub const TEXT_SEPARATOR: &str = "\n\n";

/// Elements whose text content is never visible
const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Heuristic for locating the primary content region of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentStrategy {
    /// First `<main>` element
    Main,
    /// First `<article>` element
    Article,
    /// The whole document
    Document,
}

/// Default priority order: main, then article, then the whole document
pub const DEFAULT_STRATEGIES: &[ContentStrategy] = &[
    ContentStrategy::Main,
    ContentStrategy::Article,
    ContentStrategy::Document,
];

impl ContentStrategy {
    /// Select the region this strategy targets, if present
    fn select<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        let css = match self {
            ContentStrategy::Main => "main",
            ContentStrategy::Article => "article",
            ContentStrategy::Document => return Some(document.root_element()),
        };
        let selector = Selector::parse(css).ok()?;
        document.select(&selector).next()
    }
}

/// Extract readable text from the main content region of an HTML page
pub fn extract_main_text(html: &str) -> String {
    extract_with_strategies(html, DEFAULT_STRATEGIES)
}

/// Extract readable text using the given strategies in priority order
///
/// Returns an empty string when no strategy matches.
pub fn extract_with_strategies(html: &str, strategies: &[ContentStrategy]) -> String {
    let document = Html::parse_document(html);
    strategies
        .iter()
        .find_map(|strategy| strategy.select(&document))
        .map(visible_text)
        .unwrap_or_default()
}

/// Join the trimmed, non-empty text nodes of an element
fn visible_text(element: ElementRef<'_>) -> String {
    element
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| HIDDEN_TAGS.contains(&el.name()))
            });
            (!hidden).then(|| text.trim())
        })
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(TEXT_SEPARATOR)
}
