//! Tool dispatch: argument normalization and invocation under a deadline.

use crate::ports::tool_executor::ToolExecutorPort;
use orchestrator_domain::{FunctionCall, ToolCall, ToolError, normalize_arguments, parse_arguments};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub struct ToolDispatcher {
    tools: Arc<dyn ToolExecutorPort>,
    timeout: Duration,
}

impl ToolDispatcher {
    pub fn new(tools: Arc<dyn ToolExecutorPort>, timeout: Duration) -> Self {
        Self { tools, timeout }
    }

    /// Name of the registered tool a directive should run.
    ///
    /// Names the registry does not know fall back to the first candidate.
    pub fn resolve_name<'a>(&self, directive: &'a str, candidates: &'a [String]) -> Option<&'a str> {
        if self.tools.has_tool(directive) {
            return Some(directive);
        }
        let fallback = candidates.first().map(String::as_str)?;
        warn!(requested = directive, fallback, "Unknown tool requested, using first candidate");
        Some(fallback)
    }

    /// Run `tool` with the directive's raw arguments.
    ///
    /// Results that are not JSON objects are wrapped as `{"result": value}`.
    pub async fn dispatch(&self, tool: &str, directive: &FunctionCall) -> Result<Map<String, Value>, ToolError> {
        let definition = self
            .tools
            .get_tool(tool)
            .ok_or_else(|| ToolError::not_found(tool))?;

        let raw = parse_arguments(&directive.arguments);
        let arguments = normalize_arguments(&raw, definition);
        debug!(tool, ?raw, ?arguments, "Normalized tool arguments");

        let call = ToolCall::new(tool).with_arguments(arguments);
        let started = Instant::now();
        let result = match tokio::time::timeout(self.timeout, self.tools.invoke(&call)).await {
            Ok(result) => result,
            Err(_) => Err(ToolError::timeout(format!("{} after {:?}", tool, self.timeout))),
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(Value::Object(map)) => {
                info!(tool, elapsed_ms, "Tool completed");
                Ok(map)
            }
            Ok(other) => {
                info!(tool, elapsed_ms, "Tool completed");
                let mut wrapped = Map::new();
                wrapped.insert("result".to_string(), other);
                Ok(wrapped)
            }
            Err(e) => {
                warn!(tool, elapsed_ms, error = %e, "Tool failed");
                Err(e)
            }
        }
    }
}
