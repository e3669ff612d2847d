//! Streaming progress events and report chunking.

pub mod chunking;
pub mod progress;

pub use chunking::{chunk_report, cumulative_chunks};
pub use progress::ProgressEvent;
