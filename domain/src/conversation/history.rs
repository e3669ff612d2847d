//! Bounded conversation history for one session.

use super::exchange::ConversationExchange;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of exchanges kept per session
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Count and time span of the stored exchanges
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub count: usize,
    pub first_timestamp: Option<DateTime<Utc>>,
    pub last_timestamp: Option<DateTime<Utc>>,
}

/// Fixed-capacity FIFO of past exchanges.
///
/// Appending beyond capacity evicts the oldest exchange.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    exchanges: VecDeque<ConversationExchange>,
    capacity: usize,
}

impl ConversationHistory {
    /// Create a history holding at most `capacity` exchanges (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            exchanges: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an exchange, returning the evicted one if the store was full
    pub fn append(&mut self, exchange: ConversationExchange) -> Option<ConversationExchange> {
        let evicted = if self.exchanges.len() >= self.capacity {
            self.exchanges.pop_front()
        } else {
            None
        };
        self.exchanges.push_back(exchange);
        evicted
    }

    pub fn clear(&mut self) {
        self.exchanges.clear();
    }

    /// Read-only copy, oldest first
    pub fn snapshot(&self) -> Vec<ConversationExchange> {
        self.exchanges.iter().cloned().collect()
    }

    /// The most recent `n` exchanges, oldest first
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &ConversationExchange> {
        let skip = self.exchanges.len().saturating_sub(n);
        self.exchanges.iter().skip(skip)
    }

    pub fn summary(&self) -> HistorySummary {
        HistorySummary {
            count: self.exchanges.len(),
            first_timestamp: self.exchanges.front().map(|e| e.timestamp),
            last_timestamp: self.exchanges.back().map(|e| e.timestamp),
        }
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
