//! Tool index port
//!
//! Semantic similarity search over tool descriptions. The index is optional:
//! when it is missing or fails, tool selection continues with keyword rules.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum IndexError {
    #[error("Tool index unavailable: {0}")]
    Unavailable(String),

    #[error("Tool index query failed: {0}")]
    Query(String),
}

#[async_trait]
pub trait ToolIndex: Send + Sync {
    /// Up to `k` tool names ranked by similarity to `text`, best first
    async fn search(&self, text: &str, k: usize) -> Result<Vec<String>, IndexError>;
}
