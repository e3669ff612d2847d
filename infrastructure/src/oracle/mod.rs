//! Oracle adapters
//!
//! - [`OpenAiCompatOracle`]: chat completions over HTTP
//! - [`MockOracle`]: deterministic offline replies
//! - [`DegradingOracle`]: primary with a fallback for network failures
//!
//! [`build_oracle`] picks the combination from configuration.

mod degrading;
mod mock;
mod openai_compat;

pub use degrading::DegradingOracle;
pub use mock::MockOracle;
pub use openai_compat::{OpenAiCompatOracle, OpenAiError};

use std::sync::Arc;

use orchestrator_application::ports::oracle::Oracle;
use tracing::{info, warn};

use crate::config::FileOracleConfig;

/// `mock = true` or no API key → mock only; otherwise the HTTP oracle
/// degrading to the mock.
pub fn build_oracle(config: &FileOracleConfig) -> Arc<dyn Oracle> {
    if config.mock {
        info!("Using offline mock oracle");
        return Arc::new(MockOracle::new());
    }
    let Some(api_key) = config.api_key() else {
        warn!(env = %config.api_key_env, "No API key set, using offline mock oracle");
        return Arc::new(MockOracle::new());
    };

    info!(model = %config.model, base_url = %config.base_url, "Using OpenAI-compatible oracle");
    Arc::new(DegradingOracle::new(
        Arc::new(OpenAiCompatOracle::from_config(config, api_key)),
        Arc::new(MockOracle::new()),
    ))
}
