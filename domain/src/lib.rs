//! Domain layer for finance-orchestrator
//!
//! This crate contains the core entities, value objects and pure algorithms
//! of the orchestration engine. It has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! - **Sub-question plan**: a query is decomposed into [`SubQuestionNode`]s
//!   with explicit dependencies, ordered by [`schedule`]
//! - **Placeholders**: `{{FIELD_FROM_Qn}}` tokens carry data between nodes
//! - **Tools**: named capabilities implementing [`Tool`], selected by
//!   keyword rules merged with semantic hits
//! - **Conversation**: a bounded [`ConversationHistory`] per session
//! - **Progress**: [`ProgressEvent`]s describing a run as it happens

pub mod config;
pub mod conversation;
pub mod core;
pub mod event;
pub mod oracle;
pub mod plan;
pub mod prompt;
pub mod tool;
pub mod util;

// Re-export commonly used types
pub use config::OutputFormat;
pub use conversation::{ConversationExchange, ConversationHistory, HistorySummary};
pub use core::{error::DomainError, model::Model, question::Question};
pub use event::{ProgressEvent, chunk_report, cumulative_chunks};
pub use oracle::{FunctionCall, Message, OracleResponse, Role};
pub use plan::{
    AnswerBook, AnswerRecord, AnswerStatus, DecompositionParseError, GraphError, NodeId,
    Resolution, SubQuestionNode, fallback_plan, parse_subquestions, resolve_placeholders, schedule,
};
pub use prompt::PromptTemplate;
pub use tool::{
    Tool, ToolCall, ToolDefinition, ToolError, ToolParameter, ToolSpec, keyword_hits,
    merge_candidates, normalize_arguments, parse_arguments,
};
