//! Crate error taxonomy.
//!
//! Tool-level failures (`ToolError::NotFound`, `ExecutionFailed`,
//! `InvalidArguments`) are recovered by the agent as tool-role history
//! messages so the model can see them. `ToolError::WorkerUnavailable` and any
//! `ModelError` are not locally recoverable and abort the current chat turn.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("tool not found: {0}")]
    NotFound(String),

    #[error("tool execution failed: {0}")]
    ExecutionFailed(String),

    #[error("invalid tool arguments: {0}")]
    InvalidArguments(String),

    #[error("tool worker unavailable: {0}")]
    WorkerUnavailable(String),
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model request failed: {0}")]
    Transport(String),

    #[error("model API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("failed to parse model response: {0}")]
    Parse(String),

    #[error("model returned no choices")]
    NoChoices,
}

/// Errors that abort an `Agent::chat` turn.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Tools(#[from] ToolError),
}
