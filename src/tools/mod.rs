//! Tool definitions and the client abstraction over where tools run.
//!
//! A [`ToolClient`] hides whether tools execute in-process
//! ([`local::LocalToolClient`]) or inside a separate worker process reached
//! over stdin/stdout ([`stdio::StdioToolClient`]). Both present the same
//! `call` / `list` / `close` contract to the agent.

pub mod builtin;
pub mod local;
pub mod registry;
pub mod stdio;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use crate::error::ToolError;
pub use local::{LocalToolClient, NoopToolClient};
pub use registry::ToolRegistry;
pub use stdio::StdioToolClient;

/// Input parameters for one tool call: a JSON object, structurally
/// unvalidated by the core (handlers validate their own inputs).
pub type ToolArguments = serde_json::Map<String, serde_json::Value>;

/// An executable tool body. Exists only in the process that owns the
/// registry; never crosses the wire.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn run(&self, args: ToolArguments) -> anyhow::Result<String>;
}

/// A registered tool: serializable metadata plus the local-process-only
/// handler capability. The wire projection is [`ToolSpec`], which omits the
/// handler by construction.
#[derive(Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: ToolParameters,
    pub handler: Arc<dyn ToolHandler>,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: ToolParameters,
        handler: Arc<dyn ToolHandler>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            handler,
        }
    }

    /// The serializable, handler-free projection of this definition.
    pub fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self.parameters.clone(),
        }
    }
}

impl std::fmt::Debug for ToolDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// Tool metadata as advertised to models and across the worker wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: ToolParameters,
}

/// Parameter schema in the JSON-schema object shape:
/// `{"type":"object","properties":{..},"required":[..]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameters {
    #[serde(rename = "type", default = "object_type")]
    pub kind: String,
    #[serde(default)]
    pub properties: BTreeMap<String, ParamSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSpec {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub description: String,
}

impl Default for ToolParameters {
    fn default() -> Self {
        Self {
            kind: object_type(),
            properties: BTreeMap::new(),
            required: Vec::new(),
        }
    }
}

impl ToolParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an optional parameter.
    pub fn optional(
        mut self,
        name: impl Into<String>,
        kind: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.properties.insert(
            name.into(),
            ParamSpec {
                kind: kind.into(),
                description: description.into(),
            },
        );
        self
    }

    /// Add a required parameter.
    pub fn required(
        mut self,
        name: impl Into<String>,
        kind: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let name = name.into();
        self.required.push(name.clone());
        self.optional(name, kind, description)
    }
}

fn object_type() -> String {
    "object".to_string()
}

/// Uniform access to a set of tools, wherever they execute.
///
/// Implementations: [`LocalToolClient`] (in-process registry),
/// [`StdioToolClient`] (worker subprocess), [`NoopToolClient`] (tools
/// disabled).
#[async_trait]
pub trait ToolClient: Send + Sync {
    /// Invoke a tool by name. Returns the tool's text result.
    async fn call(&self, name: &str, args: &ToolArguments) -> Result<String, ToolError>;

    /// List available tool metadata. Never exposes handlers.
    async fn list(&self) -> Result<Vec<ToolSpec>, ToolError>;

    /// Release any external resources. Safe to call more than once.
    async fn close(&self) -> Result<(), ToolError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameters_serialize_as_object_schema() {
        let params = ToolParameters::new()
            .required("city", "string", "City name")
            .optional("unit", "string", "Temperature unit");
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["type"], "object");
        assert_eq!(value["properties"]["city"]["type"], "string");
        assert_eq!(value["required"], serde_json::json!(["city"]));
    }

    #[test]
    fn empty_parameters_omit_required_list() {
        let value = serde_json::to_value(ToolParameters::new()).unwrap();
        assert_eq!(value["type"], "object");
        assert!(value.get("required").is_none());
    }

    #[test]
    fn spec_projection_round_trips() {
        let raw = r#"{"name":"t","description":"d","parameters":{"type":"object","properties":{}}}"#;
        let spec: ToolSpec = serde_json::from_str(raw).unwrap();
        assert_eq!(spec.name, "t");
        assert!(spec.parameters.properties.is_empty());
    }
}
