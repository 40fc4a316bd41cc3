//! MCP (Model Context Protocol) server implementation

use docskit::{DocsRequest, Tool, TOOL_NAME};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;
use tokio::task::AbortHandle;
use tracing::{debug, error};

/// JSON-RPC 2.0 request
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct JsonRpcRequest {
    jsonrpc: String,
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

/// JSON-RPC 2.0 response
#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 error
#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

impl JsonRpcResponse {
    fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

/// Text content block of a tool result
fn text_result(text: impl Into<String>, is_error: bool) -> Value {
    let mut result = json!({
        "content": [{
            "type": "text",
            "text": text.into()
        }]
    });
    if is_error {
        result["isError"] = json!(true);
    }
    result
}

/// MCP Server implementation
///
/// Every request runs in its own task, so a slow lookup does not hold up
/// later requests. Running requests are tracked by their JSON-RPC id so a
/// `notifications/cancelled` can abort them.
pub struct McpServer {
    tool: Tool,
    in_flight: Mutex<HashMap<String, AbortHandle>>,
}

impl McpServer {
    pub fn new(tool: Tool) -> Self {
        Self {
            tool,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            _ => JsonRpcResponse::error(
                request.id,
                -32601,
                format!("Method not found: {}", request.method),
            ),
        }
    }

    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": "docskit",
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        )
    }

    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            json!({
                "tools": [{
                    "name": TOOL_NAME,
                    "description": self.tool.description(),
                    "inputSchema": self.tool.input_schema()
                }]
            }),
        )
    }

    async fn handle_tools_call(&self, id: Option<Value>, params: Value) -> JsonRpcResponse {
        let tool_name = params
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        if tool_name != TOOL_NAME {
            return JsonRpcResponse::error(id, -32602, format!("Unknown tool: {}", tool_name));
        }

        let arguments = params.get("arguments").cloned().unwrap_or(json!({}));

        let request: DocsRequest = match serde_json::from_value(arguments) {
            Ok(req) => req,
            Err(e) => {
                return JsonRpcResponse::error(id, -32602, format!("Invalid arguments: {}", e));
            }
        };

        debug!(library = %request.library, query = %request.query, "Calling get_docs");

        match self.tool.execute(request).await {
            Ok(text) => JsonRpcResponse::success(id, text_result(text, false)),
            Err(e) => JsonRpcResponse::success(id, text_result(format!("Error: {}", e), true)),
        }
    }

    /// Handle one input line, spawning a task for requests
    async fn dispatch(self: &Arc<Self>, line: &str, tx: &UnboundedSender<JsonRpcResponse>) {
        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                let _ = tx.send(JsonRpcResponse::error(
                    None,
                    -32700,
                    format!("Parse error: {}", e),
                ));
                return;
            }
        };

        // Notifications carry no id and expect no response
        let Some(id) = request.id.clone() else {
            self.handle_notification(&request).await;
            return;
        };

        let key = id.to_string();
        let server = Arc::clone(self);
        let tx = tx.clone();

        // Held until the handle is stored, so the task cannot unregister first
        let mut in_flight = self.in_flight.lock().await;
        let task_key = key.clone();
        let handle = tokio::spawn(async move {
            let response = server.handle_request(request).await;
            server.in_flight.lock().await.remove(&task_key);
            let _ = tx.send(response);
        });
        in_flight.insert(key, handle.abort_handle());
    }

    async fn handle_notification(&self, request: &JsonRpcRequest) {
        if request.method != "notifications/cancelled" {
            debug!(method = %request.method, "Ignoring notification");
            return;
        }

        let Some(request_id) = request.params.get("requestId") else {
            return;
        };
        if let Some(handle) = self.in_flight.lock().await.remove(&request_id.to_string()) {
            debug!(request_id = %request_id, "Cancelling request");
            handle.abort();
        }
    }
}

async fn read_requests<R>(
    server: Arc<McpServer>,
    reader: R,
    tx: UnboundedSender<JsonRpcResponse>,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        server.dispatch(line, &tx).await;
    }
    Ok(())
}

/// Write responses as they arrive; ends once every sender is gone
async fn write_responses<W>(
    mut rx: UnboundedReceiver<JsonRpcResponse>,
    mut writer: W,
) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        let json = match serde_json::to_string(&response) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize response: {}", e);
                continue;
            }
        };
        writer.write_all(json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    Ok(())
}

/// Serve JSON-RPC lines from `reader`, writing responses to `writer`
///
/// Returns after the input ends and every running request has answered or
/// been cancelled.
pub async fn serve<R, W>(tool: Tool, reader: R, writer: W) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let server = Arc::new(McpServer::new(tool));
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::try_join!(read_requests(server, reader, tx), write_responses(rx, writer))?;
    Ok(())
}

/// Run the MCP server over stdio
pub async fn run_server(tool: Tool) -> io::Result<()> {
    serve(tool, BufReader::new(io::stdin()), io::stdout()).await
}
