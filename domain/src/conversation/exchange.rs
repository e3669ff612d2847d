//! Conversation exchange entity

use crate::plan::AnswerRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One completed query/answer round trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationExchange {
    pub user_query: String,
    pub assistant_response: String,
    pub timestamp: DateTime<Utc>,
    /// Snapshot of that run's answer records
    pub answered_nodes: Vec<AnswerRecord>,
}

impl ConversationExchange {
    pub fn new(
        user_query: impl Into<String>,
        assistant_response: impl Into<String>,
        answered_nodes: Vec<AnswerRecord>,
    ) -> Self {
        Self {
            user_query: user_query.into(),
            assistant_response: assistant_response.into(),
            timestamp: Utc::now(),
            answered_nodes,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}
