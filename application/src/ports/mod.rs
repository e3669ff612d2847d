//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod conversation_logger;
pub mod oracle;
pub mod progress;
pub mod tool_executor;
pub mod tool_index;
