//! DocsKit - documentation lookup for LLM agents
//!
//! Given a free-text query and a library name, DocsKit searches that
//! library's documentation site, fetches the result pages, extracts their
//! main-content text and returns a bounded excerpt.
//!
//! ## Pipeline
//!
//! 1. [`LibraryRegistry`] resolves the library to its documentation domain
//! 2. A [`Searcher`] ([`SerperClient`] by default) runs `site:<domain> <query>`
//! 3. A [`Fetcher`] ([`DefaultFetcher`] by default) extracts each page's text
//! 4. Page texts are concatenated in result order and cut to `max_chars`
//!
//! Only an unknown library or a failing search API surface as errors; page
//! failures and search timeouts degrade the output instead.

pub mod client;
mod error;
pub mod extract;
pub mod fetchers;
pub mod pipeline;
mod registry;
pub mod search;
mod tool;
mod types;

pub use client::get_docs;
pub use error::{DocsError, FetchError};
pub use extract::{extract_main_text, ContentStrategy};
pub use fetchers::{DefaultFetcher, Fetcher, FETCH_TIMEOUT_MESSAGE};
pub use pipeline::{DocsPipeline, FetchMode, NO_RESULTS_MESSAGE};
pub use registry::LibraryRegistry;
pub use search::{Searcher, SerperClient};
pub use tool::{Tool, ToolBuilder};
pub use types::{DocsRequest, SearchResult, DEFAULT_MAX_CHARS};

/// Default User-Agent string
pub const DEFAULT_USER_AGENT: &str = "docs-app/1.0";

/// Tool name exposed to agents
pub const TOOL_NAME: &str = "get_docs";

/// Tool description for LLM consumption
pub const TOOL_DESCRIPTION: &str = r#"Search the docs for a given query and library.

- Searches the library's official documentation site
- Returns plain text extracted from the top matching pages
- Output is cut to max_chars characters (default 1000)"#;

/// Extended documentation for LLM consumption (llmtxt)
pub const TOOL_LLMTXT: &str = r#"# get_docs Tool

Searches a library's official documentation and returns readable text from
the best matching pages.

## Capabilities
- Web search restricted to the library's documentation domain
- Main-content text extraction (main, then article, then whole page)
- Bounded output size

## Input Parameters
- `query` (required): The query to search for (e.g. "Chroma DB")
- `library` (required): The library to search in (e.g. "langchain", "llama-index", "openai")
- `max_chars` (optional): Maximum characters to return (default: 1000)

## Output
Plain text: the concatenated page texts cut to `max_chars` characters, or
"No results found." when the search has no matches.

## Examples

### Look up a vector store integration
```json
{"query": "Chroma DB", "library": "langchain"}
```

### Short excerpt
```json
{"query": "embeddings", "library": "openai", "max_chars": 300}
```

## Error Handling
- Unknown libraries return an error listing the supported ones
- Search timeouts return "No results found."
- Pages that time out contribute "Timeout occurred while fetching the URL."
- Pages that cannot be read contribute nothing
"#;
