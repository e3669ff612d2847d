//! The polymorphic tool interface.
//!
//! Every concrete capability (price lookup, exchange table, ...) implements
//! [`Tool`]. Descriptors are declared statically by each implementation, so
//! no reflection happens at call time.

use super::entities::{ToolCall, ToolDefinition};
use super::value_objects::ToolError;
use async_trait::async_trait;
use serde_json::Value;

/// A named capability invoked with a keyword argument map
#[async_trait]
pub trait Tool: Send + Sync {
    /// Static descriptor: name, description, ordered parameters
    fn definition(&self) -> &ToolDefinition;

    /// Invoke with already-normalized arguments.
    ///
    /// May return a JSON object or any other JSON value; callers wrap
    /// non-object values as `{"result": value}`.
    async fn invoke(&self, call: &ToolCall) -> Result<Value, ToolError>;

    fn name(&self) -> &str {
        &self.definition().name
    }
}
