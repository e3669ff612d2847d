//! Prompt domain
//!
//! Templates for the decomposition, sub-question and synthesis requests.

mod template;

pub use template::{DECOMPOSITION_MARKER, PromptTemplate, SYNTHESIS_MARKER, TOOL_RESULT_PREFIX};
