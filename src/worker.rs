//! Worker-side protocol handler.
//!
//! Runs inside the tool worker process. Each stdin line is one complete JSON
//! request; each response is one JSON object on one line. A tool miss, a
//! handler failure, or malformed input all become well-formed error responses
//! — the transport layer never errors on a tool failure, and the handler
//! survives bad input indefinitely.

use serde_json::Value;

use crate::protocol::{
    CallToolResponse, ListToolsResponse, METHOD_CALL_TOOL, METHOD_LIST_TOOLS,
};
use crate::tools::{builtin, ToolArguments, ToolRegistry};

pub struct WorkerServer {
    registry: ToolRegistry,
}

impl WorkerServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    /// A server exposing the built-in tools.
    pub fn with_builtins() -> Self {
        let mut registry = ToolRegistry::new();
        builtin::register_builtins(&mut registry);
        Self::new(registry)
    }

    /// Process one request line and produce one response line (without the
    /// trailing newline). Always returns well-formed JSON.
    pub async fn handle_line(&self, line: &str) -> String {
        // Generic parse first: recover `method` even from otherwise odd
        // payloads, and turn unparseable input into an error response.
        let raw: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => return error_response(&format!("invalid JSON: {e}")),
        };

        let method = match raw.get("method").and_then(Value::as_str) {
            Some(m) => m,
            None => return error_response("missing or invalid method field"),
        };

        match method {
            METHOD_LIST_TOOLS => self.handle_list_tools(),
            METHOD_CALL_TOOL => {
                let name = match raw.get("name").and_then(Value::as_str) {
                    Some(n) if !n.is_empty() => n,
                    _ => return error_response("missing or invalid name field for call_tool"),
                };
                let args = match raw.get("arguments") {
                    None | Some(Value::Null) => ToolArguments::new(),
                    Some(Value::Object(map)) => map.clone(),
                    Some(_) => return error_response("arguments must be an object"),
                };
                self.handle_call_tool(name, args).await
            }
            other => error_response(&format!("unknown method: {other}")),
        }
    }

    fn handle_list_tools(&self) -> String {
        // Project definitions to their handler-free wire form.
        let resp = ListToolsResponse {
            tools: self.registry.list().iter().map(|d| d.spec()).collect(),
        };
        match serde_json::to_string(&resp) {
            Ok(json) => json,
            Err(e) => error_response(&format!("failed to encode list_tools response: {e}")),
        }
    }

    async fn handle_call_tool(&self, name: &str, args: ToolArguments) -> String {
        let def = match self.registry.get(name) {
            Some(def) => def,
            None => return error_response(&format!("tool not found: {name}")),
        };

        tracing::debug!(tool = name, "executing tool call");

        match def.handler.run(args).await {
            Ok(result) => {
                let resp = CallToolResponse {
                    result,
                    error: String::new(),
                };
                match serde_json::to_string(&resp) {
                    Ok(json) => json,
                    Err(e) => error_response(&format!("failed to encode call_tool response: {e}")),
                }
            }
            Err(e) => error_response(&format!("tool execution failed: {e:#}")),
        }
    }
}

fn error_response(message: &str) -> String {
    let resp = CallToolResponse {
        result: String::new(),
        error: message.to_string(),
    };
    serde_json::to_string(&resp)
        // A struct of two strings cannot fail to serialize, but never panic
        // on the error path.
        .unwrap_or_else(|_| r#"{"result":"","error":"failed to encode error response"}"#.to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::tools::{ToolDefinition, ToolHandler, ToolParameters};

    struct Echo;

    #[async_trait]
    impl ToolHandler for Echo {
        async fn run(&self, args: ToolArguments) -> anyhow::Result<String> {
            let text = args
                .get("text")
                .and_then(|v| v.as_str())
                .ok_or_else(|| anyhow::anyhow!("missing 'text' argument"))?;
            Ok(text.to_string())
        }
    }

    fn server_with_echo() -> WorkerServer {
        let mut registry = ToolRegistry::new();
        registry.register(ToolDefinition::new(
            "echo",
            "Echo back the given text.",
            ToolParameters::new().required("text", "string", "Text to echo"),
            Arc::new(Echo),
        ));
        WorkerServer::new(registry)
    }

    async fn parsed(server: &WorkerServer, line: &str) -> Value {
        serde_json::from_str(&server.handle_line(line).await).unwrap()
    }

    #[tokio::test]
    async fn list_tools_returns_advertised_metadata() {
        let server = server_with_echo();
        let resp = parsed(&server, r#"{"method":"list_tools"}"#).await;
        let tools = resp["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["name"], "echo");
        assert_eq!(tools[0]["parameters"]["type"], "object");
        assert_eq!(tools[0]["parameters"]["required"], json!(["text"]));
    }

    #[tokio::test]
    async fn call_tool_returns_result() {
        let server = server_with_echo();
        let resp = parsed(
            &server,
            r#"{"method":"call_tool","name":"echo","arguments":{"text":"hi"}}"#,
        )
        .await;
        assert_eq!(resp["result"], "hi");
        assert!(resp.get("error").is_none());
    }

    #[tokio::test]
    async fn call_tool_without_arguments_defaults_to_empty() {
        let server = WorkerServer::with_builtins();
        let resp = parsed(&server, r#"{"method":"call_tool","name":"get_current_time"}"#).await;
        assert!(!resp["result"].as_str().unwrap().is_empty());
        assert!(resp.get("error").is_none());
    }

    #[tokio::test]
    async fn unknown_tool_yields_error_response_not_failure() {
        let server = server_with_echo();
        let resp = parsed(
            &server,
            r#"{"method":"call_tool","name":"does_not_exist","arguments":{}}"#,
        )
        .await;
        assert_eq!(resp["result"], "");
        assert!(resp["error"].as_str().unwrap().contains("tool not found"));
    }

    #[tokio::test]
    async fn handler_failure_becomes_error_response() {
        let server = server_with_echo();
        let resp = parsed(&server, r#"{"method":"call_tool","name":"echo","arguments":{}}"#).await;
        assert!(resp["error"]
            .as_str()
            .unwrap()
            .contains("tool execution failed"));
    }

    #[tokio::test]
    async fn unknown_method_is_reported() {
        let server = server_with_echo();
        let resp = parsed(&server, r#"{"method":"frobnicate"}"#).await;
        assert_eq!(resp["error"], "unknown method: frobnicate");
    }

    #[tokio::test]
    async fn malformed_json_is_survivable() {
        let server = server_with_echo();
        let resp = parsed(&server, "this is not json").await;
        assert!(resp["error"].as_str().unwrap().contains("invalid JSON"));

        // The handler keeps serving after bad input.
        let resp = parsed(&server, r#"{"method":"list_tools"}"#).await;
        assert!(resp["tools"].is_array());
    }

    #[tokio::test]
    async fn non_string_method_is_rejected() {
        let server = server_with_echo();
        let resp = parsed(&server, r#"{"method":42}"#).await;
        assert_eq!(resp["error"], "missing or invalid method field");
    }

    #[tokio::test]
    async fn non_object_arguments_are_rejected() {
        let server = server_with_echo();
        let resp = parsed(
            &server,
            r#"{"method":"call_tool","name":"echo","arguments":[1,2]}"#,
        )
        .await;
        assert_eq!(resp["error"], "arguments must be an object");
    }
}
