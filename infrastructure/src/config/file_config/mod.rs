//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every section has `#[serde(default)]`, so a partial file is valid.

mod backend;
mod logging;
mod oracle;
mod orchestration;
mod output;
mod streaming;

pub use backend::FileBackendConfig;
pub use logging::FileLoggingConfig;
pub use oracle::FileOracleConfig;
pub use orchestration::FileOrchestrationConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use streaming::FileStreamingConfig;

use orchestrator_application::{OrchestrationParams, StreamParams};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("{0} cannot be 0")]
    ZeroTimeout(&'static str),

    #[error("{0} cannot be 0")]
    ZeroCapacity(&'static str),

    #[error("model name cannot be empty")]
    EmptyModelName,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub oracle: FileOracleConfig,
    pub orchestration: FileOrchestrationConfig,
    pub streaming: FileStreamingConfig,
    pub backend: FileBackendConfig,
    pub output: FileOutputConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration, reporting the first problem found
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let timeouts = [
            ("oracle.timeout_seconds", self.oracle.timeout_seconds),
            ("orchestration.tool_timeout_seconds", self.orchestration.tool_timeout_seconds),
            ("backend.timeout_seconds", self.backend.timeout_seconds),
        ];
        if let Some((field, _)) = timeouts.iter().find(|(_, v)| *v == 0) {
            return Err(ConfigValidationError::ZeroTimeout(*field));
        }

        if self.orchestration.history_capacity == 0 {
            return Err(ConfigValidationError::ZeroCapacity("orchestration.history_capacity"));
        }
        if self.streaming.channel_capacity == 0 {
            return Err(ConfigValidationError::ZeroCapacity("streaming.channel_capacity"));
        }

        if self.oracle.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName);
        }

        Ok(())
    }

    pub fn orchestration_params(&self) -> OrchestrationParams {
        self.orchestration.to_params(self.oracle.timeout_seconds)
    }

    pub fn stream_params(&self) -> StreamParams {
        self.streaming.to_params()
    }
}
