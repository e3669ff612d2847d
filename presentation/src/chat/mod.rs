//! Interactive chat module
//!
//! Provides a readline-based chat interface over a single chat session.

mod repl;

pub use repl::ChatRepl;
