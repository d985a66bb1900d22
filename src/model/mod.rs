//! Model backend abstraction.

mod openai_compatible;

use async_trait::async_trait;
use serde::Serialize;

pub use crate::error::ModelError;
pub use openai_compatible::OpenAiCompatibleModel;

use crate::protocol::{Message, ToolCallRequest};

/// What one completion produced: final text, tool-call requests, or both.
#[derive(Debug, Clone, Default)]
pub struct ModelReply {
    pub content: String,
    pub tool_calls: Vec<ToolCallRequest>,
}

/// Tool metadata in the shape chat-completions APIs expect.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSchema {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionSchema,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionSchema {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// A remote text-generation backend with tool-aware chat.
///
/// Implementations own their transport details (HTTP, timeouts); callers see
/// only history in, [`ModelReply`] out, with [`ModelError`] on transport or
/// parse failure.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn chat(&self, messages: &[Message], tools: &[ToolSchema])
        -> Result<ModelReply, ModelError>;
}
