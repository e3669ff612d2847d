//! Sub-question planning: nodes, answers, scheduling and placeholders.
//!
//! ```text
//! oracle text ──parse_subquestions──▶ [SubQuestionNode]
//!                                          │ schedule (Kahn, FIFO)
//!                                          ▼
//!                        ordered nodes ──resolve_placeholders──▶ text for the node
//!                                          │
//!                                          ▼
//!                                     AnswerBook (one AnswerRecord per node)
//! ```

pub mod answer;
pub mod node;
pub mod parser;
pub mod placeholder;
pub mod scheduler;

pub use answer::{AnswerBook, AnswerRecord, AnswerStatus};
pub use node::{NodeId, SubQuestionNode};
pub use parser::{DecompositionParseError, fallback_plan, parse_subquestions};
pub use placeholder::{PlaceholderKey, Resolution, extract_placeholders, resolve_placeholders};
pub use scheduler::{GraphError, schedule};
