//! Orchestration configuration from TOML (`[orchestration]` section)

use orchestrator_application::OrchestrationParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOrchestrationConfig {
    /// Semantic tool hits requested per sub-question
    pub top_k: usize,
    /// Past exchanges rendered into the decomposition prompt
    pub context_exchanges: usize,
    /// Exchanges kept per session
    pub history_capacity: usize,
    pub tool_timeout_seconds: u64,
}

impl Default for FileOrchestrationConfig {
    fn default() -> Self {
        let params = OrchestrationParams::default();
        Self {
            top_k: params.top_k,
            context_exchanges: params.context_exchanges,
            history_capacity: params.history_capacity,
            tool_timeout_seconds: params.tool_timeout.as_secs(),
        }
    }
}

impl FileOrchestrationConfig {
    /// Convert to application parameters, taking the oracle deadline from `[oracle]`
    pub fn to_params(&self, oracle_timeout_seconds: u64) -> OrchestrationParams {
        OrchestrationParams::default()
            .with_top_k(self.top_k)
            .with_context_exchanges(self.context_exchanges)
            .with_history_capacity(self.history_capacity)
            .with_tool_timeout(Duration::from_secs(self.tool_timeout_seconds))
            .with_oracle_timeout(Duration::from_secs(oracle_timeout_seconds))
    }
}
