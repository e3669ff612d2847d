//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: oracle models (Gemini, GPT, custom ids)
//! - [`question::Question`]: a validated user query
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod model;
pub mod question;
pub mod string;
