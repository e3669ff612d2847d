//! Oracle port
//!
//! Defines the interface for the external language model that decomposes
//! queries, answers sub-questions and writes the final report.

use async_trait::async_trait;
use orchestrator_domain::{Message, OracleResponse, ToolDefinition};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during an oracle call
#[derive(Error, Debug, Clone)]
pub enum OracleError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Malformed response: {0}")]
    Parse(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl OracleError {
    /// Network-level failures that a degraded oracle may cover for
    pub fn is_transport(&self) -> bool {
        matches!(self, OracleError::Transport(_) | OracleError::Timeout(_))
    }
}

/// Gateway to the language model.
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Generate a reply. When `tools` is given, the oracle may answer with a
    /// function-call directive naming one of them.
    async fn generate(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
    ) -> Result<OracleResponse, OracleError>;

    /// Short identifier used in logs
    fn name(&self) -> &str {
        "oracle"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_classification() {
        assert!(OracleError::Transport("connection refused".into()).is_transport());
        assert!(OracleError::Timeout(Duration::from_secs(60)).is_transport());
        assert!(!OracleError::Parse("bad json".into()).is_transport());
        assert!(!OracleError::Other("401".into()).is_transport());
    }
}
