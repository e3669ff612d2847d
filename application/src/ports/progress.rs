//! Progress notification port
//!
//! Defines the callbacks an orchestration run reports through. All methods
//! default to no-ops so implementations override only what they display.
//!
//! Callbacks are async so that a channel-backed implementation can apply
//! backpressure on a bounded queue instead of dropping events.

use async_trait::async_trait;
use orchestrator_domain::{AnswerRecord, NodeId, SubQuestionNode};

#[async_trait]
pub trait RunProgressNotifier: Send + Sync {
    /// A run has been accepted
    async fn on_run_start(&self, _query: &str) {}

    /// The query has been decomposed into an ordered plan
    async fn on_plan_ready(&self, _ordered: &[SubQuestionNode]) {}

    /// A node is about to be processed with its resolved text
    async fn on_node_start(&self, _node: NodeId, _resolved: &str) {}

    /// A tool is about to be invoked for a node
    async fn on_tool_call(&self, _node: NodeId, _tool: &str, _question: &str) {}

    /// A tool invocation has finished
    async fn on_tool_complete(&self, _node: NodeId, _tool: &str, _success: bool) {}

    /// A node's answer has been recorded
    async fn on_node_complete(&self, _record: &AnswerRecord) {}

    /// All nodes are done; the final report is being written
    async fn on_synthesis_start(&self) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl RunProgressNotifier for NoProgress {}
