//! Conversation state kept per session.

pub mod exchange;
pub mod history;

pub use exchange::ConversationExchange;
pub use history::{ConversationHistory, DEFAULT_HISTORY_CAPACITY, HistorySummary};
