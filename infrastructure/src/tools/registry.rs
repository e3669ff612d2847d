//! Tool Registry
//!
//! The [`ToolRegistry`] owns every concrete [`Tool`] and implements
//! [`ToolExecutorPort`]. It is built once at startup and shared read-only
//! across runs.
//!
//! # Usage
//!
//! ```ignore
//! use orchestrator_infrastructure::tools::{ToolRegistry, default_tools};
//!
//! let registry = ToolRegistry::new(default_tools(&backend_config));
//! assert!(registry.has_tool("get_stock_price"));
//!
//! let call = ToolCall::new("get_exchange_info").with_arg("exchange", "HOSE");
//! let result = registry.invoke(&call).await?;
//! ```
//!
//! Registering two tools with the same name keeps the later one, in the
//! position of the first.

use std::collections::HashMap;

use async_trait::async_trait;
use orchestrator_application::ports::tool_executor::ToolExecutorPort;
use orchestrator_domain::{Tool, ToolCall, ToolError, ToolSpec};
use serde_json::Value;
use tracing::{debug, warn};

/// Name-indexed collection of tools
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
    tool_spec: ToolSpec,
}

impl ToolRegistry {
    pub fn new(tools: Vec<Box<dyn Tool>>) -> Self {
        let mut registry = Self {
            tools: HashMap::new(),
            tool_spec: ToolSpec::new(),
        };
        for tool in tools {
            registry.insert(tool);
        }
        registry
    }

    /// Register one more tool
    pub fn register(mut self, tool: Box<dyn Tool>) -> Self {
        self.insert(tool);
        self
    }

    fn insert(&mut self, tool: Box<dyn Tool>) {
        let definition = tool.definition().clone();
        if self.tools.contains_key(&definition.name) {
            warn!(tool = %definition.name, "Tool registered twice, keeping the later one");
        } else {
            debug!(tool = %definition.name, "Registered tool");
        }
        let spec = std::mem::take(&mut self.tool_spec);
        self.tool_spec = spec.register(definition.clone());
        self.tools.insert(definition.name, tool);
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[async_trait]
impl ToolExecutorPort for ToolRegistry {
    fn tool_spec(&self) -> &ToolSpec {
        &self.tool_spec
    }

    async fn invoke(&self, call: &ToolCall) -> Result<Value, ToolError> {
        let Some(tool) = self.tools.get(&call.tool_name) else {
            return Err(ToolError::not_found(format!("tool '{}'", call.tool_name)));
        };

        debug!(tool = %call.tool_name, arguments = ?call.arguments, "Invoking tool");
        let result = tool.invoke(call).await;
        if let Err(e) = &result {
            debug!(tool = %call.tool_name, code = %e.code, error = %e.message, "Tool returned an error");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orchestrator_domain::{ToolDefinition, ToolParameter};
    use serde_json::json;

    struct Constant {
        definition: ToolDefinition,
        value: Value,
    }

    impl Constant {
        fn boxed(name: &str, value: Value) -> Box<dyn Tool> {
            Box::new(Self {
                definition: ToolDefinition::new(name, format!("Returns {}", value))
                    .with_parameter(ToolParameter::new("ticker", "Ticker", false)),
                value,
            })
        }
    }

    #[async_trait]
    impl Tool for Constant {
        fn definition(&self) -> &ToolDefinition {
            &self.definition
        }

        async fn invoke(&self, _call: &ToolCall) -> Result<Value, ToolError> {
            Ok(self.value.clone())
        }
    }

    #[tokio::test]
    async fn test_registry_routes_by_name() {
        let registry = ToolRegistry::new(vec![
            Constant::boxed("get_stock_price", json!({"price": 1})),
            Constant::boxed("get_exchange_info", json!({"exchange": "HOSE"})),
        ]);

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.available_tools(),
            vec!["get_stock_price", "get_exchange_info"]
        );
        let value = registry
            .invoke(&ToolCall::new("get_exchange_info"))
            .await
            .unwrap();
        assert_eq!(value["exchange"], "HOSE");
    }

    #[tokio::test]
    async fn test_unknown_tool_is_not_found() {
        let registry = ToolRegistry::new(Vec::new());
        assert!(registry.is_empty());
        let err = registry.invoke(&ToolCall::new("nope")).await.unwrap_err();
        assert_eq!(err.code, "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_later_registration_replaces_earlier() {
        let registry = ToolRegistry::new(vec![Constant::boxed("get_macro_data", json!(1))])
            .register(Constant::boxed("get_macro_data", json!(2)));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.tool_spec().len(), 1);
        let value = registry.invoke(&ToolCall::new("get_macro_data")).await.unwrap();
        assert_eq!(value, json!(2));
    }
}
