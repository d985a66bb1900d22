//! Name-keyed tool registry.

use std::collections::HashMap;

use super::ToolDefinition;

/// Stores tool definitions by name. Registration is expected to happen at
/// construction time only; the registry is not synchronized.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, ToolDefinition>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. A definition with an already-registered name replaces
    /// the previous one.
    pub fn register(&mut self, def: ToolDefinition) {
        self.tools.insert(def.name.clone(), def);
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    /// All registered definitions, in unspecified order.
    pub fn list(&self) -> Vec<&ToolDefinition> {
        self.tools.values().collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::tools::{ToolArguments, ToolHandler, ToolParameters};

    struct Fixed(&'static str);

    #[async_trait]
    impl ToolHandler for Fixed {
        async fn run(&self, _args: ToolArguments) -> anyhow::Result<String> {
            Ok(self.0.to_string())
        }
    }

    fn def(name: &str, description: &str) -> ToolDefinition {
        ToolDefinition::new(name, description, ToolParameters::new(), Arc::new(Fixed("ok")))
    }

    #[test]
    fn get_returns_registered_definition() {
        let mut reg = ToolRegistry::new();
        reg.register(def("echo", "echoes"));
        assert!(reg.get("echo").is_some());
        assert!(reg.get("missing").is_none());
    }

    #[test]
    fn duplicate_registration_overwrites() {
        let mut reg = ToolRegistry::new();
        reg.register(def("echo", "first"));
        reg.register(def("echo", "second"));
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get("echo").unwrap().description, "second");
    }

    #[test]
    fn listed_definitions_project_to_handler_free_specs() {
        let mut reg = ToolRegistry::new();
        reg.register(def("a", "x"));
        reg.register(def("b", "y"));
        let specs: Vec<_> = reg.list().iter().map(|d| d.spec()).collect();
        assert_eq!(specs.len(), 2);
        // ToolSpec is fully serializable; a handler field cannot exist on it.
        let json = serde_json::to_string(&specs).unwrap();
        assert!(json.contains("\"name\""));
        assert!(!json.contains("handler"));
    }
}
