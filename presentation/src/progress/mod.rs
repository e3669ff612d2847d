//! Progress display for one-shot and streamed runs

pub mod reporter;
pub mod stream;
