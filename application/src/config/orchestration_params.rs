//! Orchestration parameters: run-level control.
//!
//! [`OrchestrationParams`] groups the static parameters used by
//! [`RunOrchestrationUseCase`](crate::use_cases::orchestrate::RunOrchestrationUseCase)
//! and the chat service. These are application-layer concerns, not domain
//! policy.

use orchestrator_domain::conversation::DEFAULT_HISTORY_CAPACITY;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestrationParams {
    /// Maximum semantic hits requested from the tool index.
    pub top_k: usize,
    /// Number of recent exchanges rendered as decomposition context.
    pub context_exchanges: usize,
    /// Exchanges kept per session.
    pub history_capacity: usize,
    /// Deadline for one tool invocation.
    pub tool_timeout: Duration,
    /// Deadline for one oracle call.
    pub oracle_timeout: Duration,
}

impl Default for OrchestrationParams {
    fn default() -> Self {
        Self {
            top_k: 4,
            context_exchanges: 3,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            tool_timeout: Duration::from_secs(30),
            oracle_timeout: Duration::from_secs(60),
        }
    }
}

impl OrchestrationParams {
    // ==================== Builder Methods ====================

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_context_exchanges(mut self, n: usize) -> Self {
        self.context_exchanges = n;
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = timeout;
        self
    }

    pub fn with_oracle_timeout(mut self, timeout: Duration) -> Self {
        self.oracle_timeout = timeout;
        self
    }
}
