//! In-process tool execution.

use async_trait::async_trait;

use super::{builtin, ToolArguments, ToolClient, ToolError, ToolRegistry, ToolSpec};

/// Executes tools from a local registry on the caller's task.
pub struct LocalToolClient {
    registry: ToolRegistry,
}

impl LocalToolClient {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    /// A client pre-populated with the built-in tools.
    pub fn with_builtins() -> Self {
        let mut registry = ToolRegistry::new();
        builtin::register_builtins(&mut registry);
        Self::new(registry)
    }
}

#[async_trait]
impl ToolClient for LocalToolClient {
    async fn call(&self, name: &str, args: &ToolArguments) -> Result<String, ToolError> {
        let def = self
            .registry
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        def.handler
            .run(args.clone())
            .await
            .map_err(|e| ToolError::ExecutionFailed(format!("{e:#}")))
    }

    async fn list(&self) -> Result<Vec<ToolSpec>, ToolError> {
        Ok(self.registry.list().iter().map(|d| d.spec()).collect())
    }

    async fn close(&self) -> Result<(), ToolError> {
        Ok(())
    }
}

/// Tool client for the tools-disabled configuration: advertises nothing and
/// rejects every call.
pub struct NoopToolClient;

#[async_trait]
impl ToolClient for NoopToolClient {
    async fn call(&self, name: &str, _args: &ToolArguments) -> Result<String, ToolError> {
        Err(ToolError::NotFound(name.to_string()))
    }

    async fn list(&self) -> Result<Vec<ToolSpec>, ToolError> {
        Ok(Vec::new())
    }

    async fn close(&self) -> Result<(), ToolError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::tools::{ToolDefinition, ToolHandler, ToolParameters};

    struct Failing;

    #[async_trait]
    impl ToolHandler for Failing {
        async fn run(&self, _args: ToolArguments) -> anyhow::Result<String> {
            anyhow::bail!("boom")
        }
    }

    #[tokio::test]
    async fn call_builtin_time_tool_returns_nonempty() {
        let client = LocalToolClient::with_builtins();
        let out = client
            .call("get_current_time", &ToolArguments::new())
            .await
            .unwrap();
        assert!(!out.is_empty());
    }

    #[tokio::test]
    async fn unknown_tool_is_not_found() {
        let client = LocalToolClient::with_builtins();
        let err = client
            .call("does_not_exist", &ToolArguments::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
    }

    #[tokio::test]
    async fn handler_failure_surfaces_as_execution_failed() {
        let mut registry = ToolRegistry::new();
        registry.register(ToolDefinition::new(
            "fail",
            "always fails",
            ToolParameters::new(),
            Arc::new(Failing),
        ));
        let client = LocalToolClient::new(registry);
        let err = client.call("fail", &ToolArguments::new()).await.unwrap_err();
        match err {
            ToolError::ExecutionFailed(detail) => assert!(detail.contains("boom")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn list_returns_metadata_only() {
        let client = LocalToolClient::with_builtins();
        let specs = client.list().await.unwrap();
        assert!(specs.iter().any(|s| s.name == "get_current_time"));
    }

    #[tokio::test]
    async fn noop_client_has_no_tools() {
        let client = NoopToolClient;
        assert!(client.list().await.unwrap().is_empty());
        assert!(matches!(
            client.call("anything", &ToolArguments::new()).await,
            Err(ToolError::NotFound(_))
        ));
        client.close().await.unwrap();
    }
}
