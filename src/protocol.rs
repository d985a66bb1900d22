//! Chat message and wire protocol types.
//!
//! Two layers share this module: the conversation history exchanged with the
//! model backend (OpenAI-style chat messages), and the newline-delimited JSON
//! protocol spoken between the agent process and a tool worker process. Both
//! are plain serde types; all framing is one JSON object per line.

use serde::{Deserialize, Serialize};

use crate::tools::{ToolArguments, ToolSpec};

/// Wire method name for listing a worker's tools.
pub const METHOD_LIST_TOOLS: &str = "list_tools";
/// Wire method name for invoking a worker's tool.
pub const METHOD_CALL_TOOL: &str = "call_tool";

// ── Chat messages ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// One conversational turn, serialized in the OpenAI chat-completions shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,
    /// Tool name, set on tool-role turns only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Structured tool-call requests, set on assistant turns only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallRequest>>,
    /// Id of the call this turn answers, set on tool-role turns when the
    /// model supplied one. Absent in the plain-text fallback mode, where
    /// correlation is positional by tool name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
            name: None,
            tool_calls: None,
            tool_call_id: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            name: None,
            tool_calls: None,
            tool_call_id: None,
        }
    }

    pub fn assistant(content: impl Into<String>, tool_calls: Vec<ToolCallRequest>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            name: None,
            tool_calls: if tool_calls.is_empty() {
                None
            } else {
                Some(tool_calls)
            },
            tool_call_id: None,
        }
    }

    /// A tool-result turn. `call_id` is `None` when the originating call had
    /// no id (plain-text fallback mode).
    pub fn tool(name: impl Into<String>, call_id: Option<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
            name: Some(name.into()),
            tool_calls: None,
            tool_call_id: call_id,
        }
    }
}

/// A single tool invocation requested by the model. Immutable once received.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Opaque identifier assigned by the model. Empty when the call was
    /// recovered from a plain-text reply rather than native tool calling.
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default = "function_type")]
    pub kind: String,
    pub function: FunctionCall,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// Raw argument payload as emitted by the model: JSON text, parsed only
    /// at dispatch time.
    #[serde(default)]
    pub arguments: String,
}

impl ToolCallRequest {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: function_type(),
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            },
        }
    }

    /// The call id, if the model assigned one.
    pub fn call_id(&self) -> Option<String> {
        if self.id.is_empty() {
            None
        } else {
            Some(self.id.clone())
        }
    }
}

fn function_type() -> String {
    "function".to_string()
}

// ── Worker wire protocol ─────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct ListToolsRequest {
    pub method: String,
}

impl ListToolsRequest {
    pub fn new() -> Self {
        Self {
            method: METHOD_LIST_TOOLS.to_string(),
        }
    }
}

impl Default for ListToolsRequest {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CallToolRequest {
    pub method: String,
    pub name: String,
    #[serde(default)]
    pub arguments: ToolArguments,
}

impl CallToolRequest {
    pub fn new(name: impl Into<String>, arguments: ToolArguments) -> Self {
        Self {
            method: METHOD_CALL_TOOL.to_string(),
            name: name.into(),
            arguments,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListToolsResponse {
    pub tools: Vec<ToolSpec>,
}

/// Response to `call_tool`, and the error shape for every failure the worker
/// reports. `error` is empty exactly when the call succeeded.
#[derive(Debug, Serialize, Deserialize)]
pub struct CallToolResponse {
    #[serde(default)]
    pub result: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_serializes_without_optional_fields() {
        let msg = Message::user("hello");
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hello"}"#);
    }

    #[test]
    fn tool_message_carries_name_and_call_id() {
        let msg = Message::tool("get_current_time", Some("call_1".to_string()), "12:00");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["role"], "tool");
        assert_eq!(value["name"], "get_current_time");
        assert_eq!(value["tool_call_id"], "call_1");
    }

    #[test]
    fn tool_message_without_id_omits_the_field() {
        let msg = Message::tool("get_current_time", None, "12:00");
        let value = serde_json::to_value(&msg).unwrap();
        assert!(value.get("tool_call_id").is_none());
    }

    #[test]
    fn assistant_message_with_no_calls_omits_tool_calls() {
        let msg = Message::assistant("done", Vec::new());
        let value = serde_json::to_value(&msg).unwrap();
        assert!(value.get("tool_calls").is_none());
    }

    #[test]
    fn tool_call_request_round_trips_openai_shape() {
        let raw = r#"{"id":"abc","type":"function","function":{"name":"f","arguments":"{}"}}"#;
        let call: ToolCallRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(call.function.name, "f");
        assert_eq!(call.call_id().as_deref(), Some("abc"));
    }

    #[test]
    fn call_tool_request_defaults_missing_arguments() {
        let raw = r#"{"method":"call_tool","name":"get_current_time"}"#;
        let req: CallToolRequest = serde_json::from_str(raw).unwrap();
        assert!(req.arguments.is_empty());
    }

    #[test]
    fn error_field_absent_on_success_response() {
        let resp = CallToolResponse {
            result: "ok".to_string(),
            error: String::new(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert_eq!(json, r#"{"result":"ok"}"#);
    }
}
