//! Application-level configuration.
//!
//! - [`OrchestrationParams`]: run control (tool selection width, context, timeouts)
//! - [`StreamParams`]: progress channel and content chunking

pub mod orchestration_params;
pub mod stream_params;

pub use orchestration_params::OrchestrationParams;
pub use stream_params::StreamParams;
