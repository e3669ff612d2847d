//! Tool domain module
//!
//! Tools are named capabilities the oracle can ask for. Each tool is a
//! [`Tool`] implementation carrying a static [`ToolDefinition`].
//!
//! ```text
//! oracle directive ──parse_arguments──▶ raw map ──normalize_arguments──▶ ToolCall ──▶ Tool::invoke
//!                                                     (exact / case / alias / single param)
//! ```
//!
//! Selection of candidate tools combines keyword rules with semantic hits,
//! see [`selection`].

pub mod arguments;
pub mod entities;
pub mod selection;
pub mod traits;
pub mod value_objects;

pub use arguments::{ARGUMENT_ALIASES, canonical_alias, normalize_arguments, parse_arguments};
pub use entities::{ToolCall, ToolDefinition, ToolParameter, ToolSpec};
pub use selection::{KEYWORD_RULES, KeywordRule, keyword_hits, merge_candidates};
pub use traits::Tool;
pub use value_objects::ToolError;
