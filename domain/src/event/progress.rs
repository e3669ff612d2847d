//! Progress events emitted during one orchestration run.
//!
//! Serialized as one JSON object per event, discriminated by `type`:
//!
//! ```json
//! {"type": "tool_call", "tool": "get_stock_price", "question": "What is the price of FPT?", "node": 2}
//! ```

use crate::plan::{AnswerRecord, NodeId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    Start {
        message: String,
    },
    Reasoning {
        message: String,
    },
    ToolCall {
        tool: String,
        question: String,
        node: NodeId,
    },
    ToolComplete {
        tool: String,
        node: NodeId,
        success: bool,
    },
    /// Cumulative text of the final report streamed so far
    Content {
        content: String,
    },
    Done {
        final_report: String,
        answered_subquestions: Vec<AnswerRecord>,
    },
    Error {
        error: String,
    },
}

impl ProgressEvent {
    pub fn type_name(&self) -> &'static str {
        match self {
            ProgressEvent::Start { .. } => "start",
            ProgressEvent::Reasoning { .. } => "reasoning",
            ProgressEvent::ToolCall { .. } => "tool_call",
            ProgressEvent::ToolComplete { .. } => "tool_complete",
            ProgressEvent::Content { .. } => "content",
            ProgressEvent::Done { .. } => "done",
            ProgressEvent::Error { .. } => "error",
        }
    }

    /// `done` and `error` end a run
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProgressEvent::Done { .. } | ProgressEvent::Error { .. })
    }

    /// Build an error event, substituting a generic message for an empty one
    pub fn error(message: impl Into<String>) -> Self {
        let message = message.into();
        let error = if message.trim().is_empty() {
            "internal error".to_string()
        } else {
            message
        };
        ProgressEvent::Error { error }
    }
}
