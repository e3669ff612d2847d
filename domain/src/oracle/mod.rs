//! Oracle message and response types.
//!
//! The oracle is an external language model that maps an ordered list of
//! [`Message`]s to free text or a [`FunctionCall`] directive.

pub mod message;
pub mod response;

pub use message::{Message, Role, fold_system_messages};
pub use response::{FunctionCall, OracleResponse};
