//! Built-in tools available to both the local client and the worker.

use std::sync::Arc;

use async_trait::async_trait;

use super::{ToolArguments, ToolDefinition, ToolHandler, ToolParameters, ToolRegistry};

/// Returns the current local time. Ignores any arguments.
pub struct CurrentTime;

#[async_trait]
impl ToolHandler for CurrentTime {
    async fn run(&self, _args: ToolArguments) -> anyhow::Result<String> {
        Ok(chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string())
    }
}

pub fn current_time_tool() -> ToolDefinition {
    ToolDefinition::new(
        "get_current_time",
        "Get the current local date and time. Takes no arguments.",
        ToolParameters::new(),
        Arc::new(CurrentTime),
    )
}

/// Register every built-in tool.
pub fn register_builtins(registry: &mut ToolRegistry) {
    registry.register(current_time_tool());
}
