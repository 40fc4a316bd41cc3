//! Tool builder and contract for DocsKit

use crate::error::DocsError;
use crate::fetchers::DefaultFetcher;
use crate::pipeline::{DocsPipeline, FetchMode};
use crate::registry::LibraryRegistry;
use crate::search::SerperClient;
use crate::types::DocsRequest;
use crate::{DEFAULT_USER_AGENT, TOOL_DESCRIPTION, TOOL_LLMTXT};
use schemars::schema_for;
use std::sync::Arc;
use std::time::Duration;

/// Builder for configuring the `get_docs` tool
#[derive(Debug, Clone, Default)]
pub struct ToolBuilder {
    /// Search API key
    api_key: String,
    /// Custom search endpoint
    search_endpoint: Option<String>,
    /// Custom User-Agent
    user_agent: Option<String>,
    /// Custom library table
    registry: Option<LibraryRegistry>,
    /// Results requested per search
    num_results: Option<usize>,
    /// Per-request timeout for search and page fetches
    timeout: Option<Duration>,
    /// Page fetch mode
    fetch_mode: FetchMode,
}

impl ToolBuilder {
    /// Create a new tool builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    /// Use a different search endpoint
    pub fn search_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.search_endpoint = Some(endpoint.into());
        self
    }

    /// Set custom User-Agent
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Replace the built-in library table
    pub fn registry(mut self, registry: LibraryRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Set the number of search results fetched per lookup
    pub fn num_results(mut self, num: usize) -> Self {
        self.num_results = Some(num);
        self
    }

    /// Set the timeout applied to the search and to each page fetch
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set how result pages are fetched
    pub fn fetch_mode(mut self, mode: FetchMode) -> Self {
        self.fetch_mode = mode;
        self
    }

    /// Build the tool
    pub fn build(self) -> Tool {
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let mut searcher = SerperClient::new(self.api_key).user_agent(user_agent.clone());
        if let Some(endpoint) = self.search_endpoint {
            searcher = searcher.endpoint(endpoint);
        }
        if let Some(num) = self.num_results {
            searcher = searcher.num_results(num);
        }

        let mut fetcher = DefaultFetcher::new().user_agent(user_agent);
        if let Some(timeout) = self.timeout {
            searcher = searcher.timeout(timeout);
            fetcher = fetcher.timeout(timeout);
        }

        let registry = self.registry.unwrap_or_else(LibraryRegistry::with_defaults);
        let pipeline = DocsPipeline::new(registry, Arc::new(searcher), Arc::new(fetcher))
            .fetch_mode(self.fetch_mode);

        Tool { pipeline }
    }
}

/// Configured `get_docs` tool
#[derive(Clone)]
pub struct Tool {
    pipeline: DocsPipeline,
}

impl Tool {
    /// Create a new tool builder
    pub fn builder() -> ToolBuilder {
        ToolBuilder::new()
    }

    /// Create a tool from an already assembled pipeline
    pub fn from_pipeline(pipeline: DocsPipeline) -> Self {
        Self { pipeline }
    }

    /// Get tool description, including the supported libraries
    pub fn description(&self) -> String {
        let libraries = self.pipeline.registry().libraries().collect::<Vec<_>>();
        format!(
            "{}\n\nSupports {}.",
            TOOL_DESCRIPTION,
            libraries.join(", ")
        )
    }

    /// Get full documentation (llmtxt)
    pub fn llmtxt(&self) -> &'static str {
        TOOL_LLMTXT
    }

    /// Library table used by this tool
    pub fn registry(&self) -> &LibraryRegistry {
        self.pipeline.registry()
    }

    /// Get input schema as JSON
    pub fn input_schema(&self) -> serde_json::Value {
        let schema = schema_for!(DocsRequest);
        let mut value = serde_json::to_value(schema).unwrap_or_default();

        // Advertise the registered libraries as the allowed values
        if let Some(library) = value
            .get_mut("properties")
            .and_then(|p| p.get_mut("library"))
            .and_then(|l| l.as_object_mut())
        {
            let libraries = self
                .registry()
                .libraries()
                .map(|id| serde_json::Value::String(id.to_string()))
                .collect();
            library.insert("enum".to_string(), serde_json::Value::Array(libraries));
        }

        value
    }

    /// Execute the tool with the given request
    pub async fn execute(&self, req: DocsRequest) -> Result<String, DocsError> {
        self.pipeline
            .retrieve_docs(&req.query, &req.library, req.max_chars)
            .await
    }
}
