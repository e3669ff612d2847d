//! Streaming configuration from TOML (`[streaming]` section)

use orchestrator_application::StreamParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStreamingConfig {
    /// Bounded event channel size
    pub channel_capacity: usize,
    /// Consumer receive timeout per attempt
    pub poll_interval_ms: u64,
    /// Longest content chunk, in characters
    pub chunk_max_len: usize,
    /// Pause between content chunks
    pub chunk_delay_ms: u64,
}

impl Default for FileStreamingConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 64,
            poll_interval_ms: 100,
            chunk_max_len: 10,
            chunk_delay_ms: 20,
        }
    }
}

impl FileStreamingConfig {
    pub fn to_params(&self) -> StreamParams {
        StreamParams::default()
            .with_channel_capacity(self.channel_capacity)
            .with_poll_interval(Duration::from_millis(self.poll_interval_ms))
            .with_chunk_max_len(self.chunk_max_len)
            .with_chunk_delay(Duration::from_millis(self.chunk_delay_ms))
    }
}
