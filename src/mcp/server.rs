//! MCP JSON-RPC 2.0 server: reads requests from stdin, writes responses to stdout.
//!
//! The MCP protocol uses newline-delimited JSON over STDIO.
//! Tracing output goes to stderr so it doesn't interfere with the protocol.

use std::io::{self, BufRead, Write};

use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::tools::{self, ToolContext};
use super::types::*;

pub struct McpServer {
    ctx: ToolContext,
}

impl McpServer {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }

    /// Serve stdin/stdout until stdin closes.
    pub fn run_stdio(&self) {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run(stdin.lock(), &mut stdout.lock());
    }

    /// Serve newline-delimited requests from `input`, one response line per request.
    pub fn run(&self, input: impl BufRead, output: &mut impl Write) {
        info!(root = %self.ctx.root.display(), "MCP server starting");

        for line in input.lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    error!(error = %e, "failed to read input");
                    break;
                }
            };

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            debug!(request = %trimmed, "received request");

            let response = match serde_json::from_str::<JsonRpcRequest>(trimmed) {
                Ok(request) => self.handle_request(&request),
                Err(e) => {
                    warn!(error = %e, "invalid JSON-RPC request");
                    Some(JsonRpcResponse::error(None, PARSE_ERROR, format!("Parse error: {}", e)))
                }
            };

            if let Some(resp) = response {
                write_response(output, &resp);
            }
        }

        info!("MCP server shutting down");
    }

    /// Handle one request. Notifications get no response.
    pub fn handle_request(&self, request: &JsonRpcRequest) -> Option<JsonRpcResponse> {
        let id = request.id.clone();

        match request.method.as_str() {
            "initialize" => {
                info!("client initializing");
                let result = InitializeResult {
                    protocol_version: PROTOCOL_VERSION.to_string(),
                    capabilities: ServerCapabilities {
                        tools: ToolCapability {},
                    },
                    server_info: ServerInfo {
                        name: "featurelens".to_string(),
                        version: env!("CARGO_PKG_VERSION").to_string(),
                    },
                };
                Some(JsonRpcResponse::from_result(id, &result))
            }

            "notifications/initialized" => {
                info!("client initialized");
                None
            }

            "tools/list" => {
                debug!("listing tools");
                let result = ToolsListResult {
                    tools: tools::list_tools(),
                };
                Some(JsonRpcResponse::from_result(id, &result))
            }

            "tools/call" => {
                let params: ToolsCallParams = match serde_json::from_value(request.params.clone()) {
                    Ok(p) => p,
                    Err(e) => {
                        return Some(JsonRpcResponse::error(
                            id,
                            INVALID_PARAMS,
                            format!("Invalid params: {}", e),
                        ));
                    }
                };

                debug!(tool = %params.name, "calling tool");
                let result = tools::call_tool(&self.ctx, &params.name, &params.arguments);
                Some(JsonRpcResponse::from_result(id, &result))
            }

            "ping" => Some(JsonRpcResponse::success(id, Value::Object(Default::default()))),

            _ => {
                warn!(method = %request.method, "unknown method");
                Some(JsonRpcResponse::error(
                    id,
                    METHOD_NOT_FOUND,
                    format!("Method not found: {}", request.method),
                ))
            }
        }
    }
}

/// Write a JSON-RPC response as one line.
fn write_response(output: &mut impl Write, response: &JsonRpcResponse) {
    let json = match serde_json::to_string(response) {
        Ok(j) => j,
        Err(e) => {
            error!(error = %e, "failed to serialize response");
            return;
        }
    };
    debug!(response = %json, "sending response");
    if let Err(e) = writeln!(output, "{}", json).and_then(|_| output.flush()) {
        error!(error = %e, "failed to write response");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FeatureLensConfig;
    use std::fs;
    use tempfile::TempDir;

    fn serve(dir: &TempDir, input: &str) -> Vec<Value> {
        let mut ctx = ToolContext::new(dir.path().to_path_buf(), FeatureLensConfig::default());
        ctx.write_output = false;
        let server = McpServer::new(ctx);
        let mut out = Vec::new();
        server.run(input.as_bytes(), &mut out);
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_handshake_and_listing() {
        let dir = TempDir::new().unwrap();
        let responses = serve(
            &dir,
            concat!(
                r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#, "\n",
                r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#, "\n",
                "\n",
                r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#, "\n",
                r#"{"jsonrpc":"2.0","id":3,"method":"ping"}"#, "\n",
            ),
        );

        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0]["result"]["serverInfo"]["name"], "featurelens");
        assert_eq!(responses[0]["result"]["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(responses[1]["id"], 2);
        assert_eq!(responses[1]["result"]["tools"][0]["name"], "feature_graph");
        assert!(responses[1]["result"]["tools"][0]["inputSchema"].is_object());
        assert_eq!(responses[2]["result"], serde_json::json!({}));
    }

    #[test]
    fn test_protocol_errors() {
        let dir = TempDir::new().unwrap();
        let responses = serve(
            &dir,
            concat!(
                "{not json\n",
                r#"{"jsonrpc":"2.0","id":7,"method":"resources/list"}"#, "\n",
                r#"{"jsonrpc":"2.0","id":8,"method":"tools/call","params":{}}"#, "\n",
            ),
        );
        assert_eq!(responses[0]["error"]["code"], PARSE_ERROR);
        assert_eq!(responses[1]["error"]["code"], METHOD_NOT_FOUND);
        assert_eq!(responses[2]["error"]["code"], INVALID_PARAMS);
    }

    #[test]
    fn test_tool_call_round_trip() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.py"), "from b import helper\n").unwrap();
        fs::write(dir.path().join("b.py"), "def helper():\n    pass\n").unwrap();

        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 4,
            "method": "tools/call",
            "params": {
                "name": "feature_graph",
                "arguments": {"featureId": "helpers", "seeds": ["a.py"], "relevanceThreshold": 1}
            }
        });
        let responses = serve(&dir, &format!("{}\n", request));

        let result = &responses[0]["result"];
        assert!(result.get("isError").is_none());
        let text = result["content"][0]["text"].as_str().unwrap();
        let summary: Value = serde_json::from_str(text).unwrap();
        assert_eq!(summary["fileCount"], 2);
        assert_eq!(summary["featureId"], "helpers");
    }
}
