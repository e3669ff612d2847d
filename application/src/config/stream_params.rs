//! Streaming parameters: event delivery control.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Controls the progress channel and content chunking of streamed runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamParams {
    /// Capacity of the bounded progress channel.
    pub channel_capacity: usize,
    /// How long the consumer waits on the channel before re-checking.
    pub poll_interval: Duration,
    /// Maximum characters per content chunk.
    pub chunk_max_len: usize,
    /// Pause between content chunks.
    pub chunk_delay: Duration,
}

impl Default for StreamParams {
    fn default() -> Self {
        Self {
            channel_capacity: 64,
            poll_interval: Duration::from_millis(100),
            chunk_max_len: 10,
            chunk_delay: Duration::from_millis(20),
        }
    }
}

impl StreamParams {
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_chunk_max_len(mut self, max_len: usize) -> Self {
        self.chunk_max_len = max_len;
        self
    }

    pub fn with_chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = delay;
        self
    }
}
