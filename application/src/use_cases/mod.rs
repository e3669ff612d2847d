//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod answer_subquestion;
pub mod chat_service;
pub mod decompose;
pub mod dispatch;
pub mod event_stream;
pub mod orchestrate;
pub mod select_tools;
pub(crate) mod shared;
pub mod synthesize;
