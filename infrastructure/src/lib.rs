//! Infrastructure layer for finance-orchestrator
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: oracle clients, the tool suite, the tool
//! index, configuration file loading and the conversation log.

pub mod config;
pub mod index;
pub mod logging;
pub mod oracle;
pub mod tools;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileBackendConfig, FileConfig, FileLoggingConfig,
    FileOracleConfig, FileOrchestrationConfig, FileOutputConfig, FileOutputFormat,
    FileStreamingConfig,
};
pub use index::LexicalToolIndex;
pub use logging::JsonlConversationLogger;
pub use oracle::{DegradingOracle, MockOracle, OpenAiCompatOracle, OpenAiError, build_oracle};
pub use tools::{BackendClient, BackendError, ToolRegistry, default_registry, default_tools};
