//! Oracle that falls back to a secondary on network failures

use std::sync::Arc;

use async_trait::async_trait;
use orchestrator_application::ports::oracle::{Oracle, OracleError};
use orchestrator_domain::{Message, OracleResponse, ToolDefinition};
use tracing::warn;

/// Wraps a primary oracle; `Transport` and `Timeout` errors are answered by
/// the fallback instead. Other errors pass through unchanged.
pub struct DegradingOracle {
    primary: Arc<dyn Oracle>,
    fallback: Arc<dyn Oracle>,
}

impl DegradingOracle {
    pub fn new(primary: Arc<dyn Oracle>, fallback: Arc<dyn Oracle>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl Oracle for DegradingOracle {
    async fn generate(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
    ) -> Result<OracleResponse, OracleError> {
        match self.primary.generate(messages, tools).await {
            Err(e) if e.is_transport() => {
                warn!(
                    primary = self.primary.name(),
                    fallback = self.fallback.name(),
                    error = %e,
                    "Oracle unreachable, answering from fallback"
                );
                self.fallback.generate(messages, tools).await
            }
            other => other,
        }
    }

    fn name(&self) -> &str {
        self.primary.name()
    }
}
