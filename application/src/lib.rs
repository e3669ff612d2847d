//! Application layer for finance-orchestrator
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{OrchestrationParams, StreamParams};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    oracle::{Oracle, OracleError},
    progress::{NoProgress, RunProgressNotifier},
    tool_executor::ToolExecutorPort,
    tool_index::{IndexError, ToolIndex},
};
pub use use_cases::chat_service::{
    ChatError, ChatService, HealthStatus, HistoryView, SessionId, SessionInfo,
};
pub use use_cases::event_stream::{ChannelProgress, EventStream, StreamSignal, spawn_run};
pub use use_cases::orchestrate::{
    OrchestrationError, OrchestrationReport, RunOrchestrationInput, RunOrchestrationUseCase,
};
pub use use_cases::synthesize::summarize_records;
