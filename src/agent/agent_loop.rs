//! The tool-calling conversation loop.

use std::sync::Arc;

use crate::error::{AgentError, ToolError};
use crate::model::{FunctionSchema, ModelClient, ToolSchema};
use crate::protocol::{Message, Role, ToolCallRequest};
use crate::tools::{NoopToolClient, ToolArguments, ToolClient, ToolSpec};

use super::extract::normalize_tool_calls;
use super::prompt::build_system_prompt;

/// Final answer returned when the model keeps requesting tools past the
/// round limit. A circuit breaker, not an error: the turn completes normally.
pub const MAX_DEPTH_MESSAGE: &str = "Error: maximum tool call depth exceeded.";

const DEFAULT_MAX_HISTORY: usize = 20;
const DEFAULT_MAX_ROUNDS: usize = 4;

/// Drives one linear conversation: owns the history and composes a model
/// client with a tool client. Not usable from multiple sessions at once.
pub struct Agent {
    model: Arc<dyn ModelClient>,
    tools: Arc<dyn ToolClient>,
    tools_enabled: bool,
    history: Vec<Message>,
    max_history: usize,
    max_rounds: usize,
}

impl Agent {
    /// Create an agent. `tool_client` of `None` disables tool use entirely.
    /// A `max_history` or `max_rounds` of zero selects the default.
    pub fn new(
        model: Arc<dyn ModelClient>,
        tool_client: Option<Arc<dyn ToolClient>>,
        max_history: usize,
        max_rounds: usize,
    ) -> Self {
        let tools_enabled = tool_client.is_some();
        Self {
            model,
            tools: tool_client.unwrap_or_else(|| Arc::new(NoopToolClient)),
            tools_enabled,
            history: Vec::new(),
            max_history: if max_history == 0 {
                DEFAULT_MAX_HISTORY
            } else {
                max_history
            },
            max_rounds: if max_rounds == 0 {
                DEFAULT_MAX_ROUNDS
            } else {
                max_rounds
            },
        }
    }

    /// Process one user input to completion: final model text, or the fixed
    /// round-limit message if the model never stops requesting tools.
    pub async fn chat(&mut self, input: &str) -> Result<String, AgentError> {
        if self.history.is_empty() {
            self.history.push(Message::system(build_system_prompt()));
        }

        self.history.push(Message::user(input));
        self.trim_history();

        let schemas = if self.tools_enabled {
            let specs = self.tools.list().await?;
            tool_schemas(&specs)
        } else {
            Vec::new()
        };

        for round in 0..self.max_rounds {
            tracing::debug!(round, "querying model");

            let reply = self.model.chat(&self.history, &schemas).await?;
            // The plain-text convention is only in play when tools were
            // offered; with tools disabled a JSON-shaped answer is just the
            // answer.
            let calls = if self.tools_enabled {
                normalize_tool_calls(&reply.content, reply.tool_calls)
            } else {
                reply.tool_calls
            };

            self.history
                .push(Message::assistant(reply.content.clone(), calls.clone()));
            self.trim_history();

            if calls.is_empty() {
                return Ok(reply.content);
            }

            // Execute in the order the model emitted; one failed call becomes
            // a tool-role error message, never an aborted round.
            for call in &calls {
                let content = match self.execute_call(call).await {
                    Ok(result) => result,
                    Err(ToolError::WorkerUnavailable(detail)) => {
                        return Err(ToolError::WorkerUnavailable(detail).into());
                    }
                    Err(e) => {
                        tracing::warn!(tool = %call.function.name, "tool call failed: {e}");
                        format!("Error: {e}")
                    }
                };
                self.history
                    .push(Message::tool(&call.function.name, call.call_id(), content));
            }
            self.trim_history();
        }

        tracing::warn!(
            rounds = self.max_rounds,
            "model kept requesting tools past the round limit"
        );
        Ok(MAX_DEPTH_MESSAGE.to_string())
    }

    /// Discard all history. The next `chat` call re-seeds the system message.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// The conversation so far.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    async fn execute_call(&self, call: &ToolCallRequest) -> Result<String, ToolError> {
        let args: ToolArguments = serde_json::from_str(&call.function.arguments)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;
        self.tools.call(&call.function.name, &args).await
    }

    /// Keep the non-system suffix within `max_history`, dropping oldest
    /// first. The system message is never dropped.
    fn trim_history(&mut self) {
        let start = self
            .history
            .iter()
            .position(|m| m.role == Role::System)
            .map(|i| i + 1)
            .unwrap_or(0);

        let non_system = self.history.len() - start;
        if non_system > self.max_history {
            let excess = non_system - self.max_history;
            self.history.drain(start..start + excess);
        }
    }
}

/// Convert tool metadata into the schema shape chat-completions APIs expect.
fn tool_schemas(specs: &[ToolSpec]) -> Vec<ToolSchema> {
    specs
        .iter()
        .map(|spec| ToolSchema {
            kind: "function".to_string(),
            function: FunctionSchema {
                name: spec.name.clone(),
                description: spec.description.clone(),
                parameters: serde_json::to_value(&spec.parameters)
                    .unwrap_or_else(|_| serde_json::json!({"type": "object"})),
            },
        })
        .collect()
}
