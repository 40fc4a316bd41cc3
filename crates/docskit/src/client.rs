//! One-shot entry points
//!
//! These build a default [`Tool`](crate::Tool) per call. For repeated
//! lookups or custom configuration, build a tool with
//! [`ToolBuilder`](crate::ToolBuilder) and reuse it.

use crate::error::DocsError;
use crate::tool::Tool;
use crate::types::DocsRequest;

/// Look up documentation with the default registry, endpoint and timeouts
pub async fn get_docs(api_key: &str, req: DocsRequest) -> Result<String, DocsError> {
    Tool::builder().api_key(api_key).build().execute(req).await
}
