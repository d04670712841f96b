//! Tools the reasoning loop may invoke.

pub mod calculator;

pub use calculator::CalculatorTool;

use doctalk_core::{AppError, AppResult};
use std::sync::Arc;

/// A named capability the reasoning loop may invoke.
///
/// The description is part of the contract: the model reads it to decide
/// when the tool applies. Invocation is synchronous and fallible; failures
/// are fed back to the model as observations, not surfaced to the caller.
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn invoke(&self, input: &str) -> AppResult<String>;
}

impl std::fmt::Debug for dyn Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool").field("name", &self.name()).finish()
    }
}

/// Registry of available tools, fixed after startup.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool. Names must be unique.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> AppResult<()> {
        if self.tools.iter().any(|t| t.name() == tool.name()) {
            return Err(AppError::DuplicateTool(tool.name().to_string()));
        }

        tracing::debug!("Registered tool '{}'", tool.name());
        self.tools.push(tool);
        Ok(())
    }

    /// Look up a tool by name.
    pub fn resolve(&self, name: &str) -> AppResult<Arc<dyn Tool>> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .cloned()
            .ok_or_else(|| AppError::UnknownTool(name.to_string()))
    }

    /// Names and descriptions in registration order, for the prompt.
    pub fn describe_all(&self) -> Vec<(String, String)> {
        self.tools
            .iter()
            .map(|t| (t.name().to_string(), t.description().to_string()))
            .collect()
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
    use super::*;

    struct EchoTool;

    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Repeats the input back"
        }

        fn invoke(&self, input: &str) -> AppResult<String> {
            Ok(input.to_string())
        }
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool)).unwrap();

        let tool = registry.resolve("echo").unwrap();
        assert_eq!(tool.invoke("hello").unwrap(), "hello");
    }

    #[test]
    fn test_duplicate_registration_is_error() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool)).unwrap();

        let err = registry.register(Arc::new(EchoTool)).unwrap_err();
        assert!(matches!(err, AppError::DuplicateTool(_)));
    }

    #[test]
    fn test_unknown_tool_is_error() {
        let registry = ToolRegistry::new();
        let err = registry.resolve("missing").unwrap_err();
        assert!(matches!(err, AppError::UnknownTool(_)));
        assert_eq!(err.to_string(), "Unknown tool: missing");
    }

    #[test]
    fn test_describe_all_in_registration_order() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(CalculatorTool)).unwrap();
        registry.register(Arc::new(EchoTool)).unwrap();

        let described = registry.describe_all();
        assert_eq!(described.len(), 2);
        assert_eq!(described[0].0, "calculator");
        assert_eq!(described[1].0, "echo");
    }
}
