//! Configuration file loading for finance-orchestrator
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment variables `ORCHESTRATOR_<SECTION>__<KEY>`
//! 2. `--config <path>` specified file
//! 3. Project root: `./orchestrator.toml` or `./.orchestrator.toml`
//! 4. Global: `$XDG_CONFIG_HOME/finance-orchestrator/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileBackendConfig, FileConfig, FileLoggingConfig, FileOracleConfig,
    FileOrchestrationConfig, FileOutputConfig, FileOutputFormat, FileStreamingConfig,
};
pub use loader::ConfigLoader;
