//! Tool Executor port
//!
//! Defines the interface for looking up and invoking registered tools.

use async_trait::async_trait;
use orchestrator_domain::{ToolCall, ToolDefinition, ToolError, ToolSpec};
use serde_json::Value;

/// Port for tool invocation
///
/// The registry behind it is built once at startup and shared read-only
/// across concurrent runs.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Get the specification of all available tools
    fn tool_spec(&self) -> &ToolSpec;

    /// Check if a tool is available
    fn has_tool(&self, name: &str) -> bool {
        self.tool_spec().contains(name)
    }

    /// Get the definition of a specific tool
    fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tool_spec().get(name)
    }

    /// Get names of all available tools, in registration order
    fn available_tools(&self) -> Vec<&str> {
        self.tool_spec().names().collect()
    }

    /// Invoke a tool with normalized arguments
    async fn invoke(&self, call: &ToolCall) -> Result<Value, ToolError>;
}
