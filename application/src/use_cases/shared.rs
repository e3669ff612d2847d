//! Shared utilities for use cases.

use crate::ports::oracle::{Oracle, OracleError};
use orchestrator_domain::{Message, OracleResponse, ToolDefinition};
use std::time::Duration;

/// Call the oracle with an explicit deadline.
///
/// An elapsed deadline is reported as [`OracleError::Timeout`].
pub(crate) async fn generate_with_timeout(
    oracle: &dyn Oracle,
    messages: &[Message],
    tools: Option<&[ToolDefinition]>,
    timeout: Duration,
) -> Result<OracleResponse, OracleError> {
    match tokio::time::timeout(timeout, oracle.generate(messages, tools)).await {
        Ok(result) => result,
        Err(_) => Err(OracleError::Timeout(timeout)),
    }
}
