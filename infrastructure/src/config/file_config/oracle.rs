//! Oracle configuration from TOML (`[oracle]` section)

use serde::{Deserialize, Serialize};

/// OpenAI-compatible chat completion endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOracleConfig {
    /// Base URL of the chat completions API.
    pub base_url: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Environment variable holding the API key (default: "GEMINI_API_KEY").
    pub api_key_env: String,
    /// Per-call timeout.
    pub timeout_seconds: u64,
    pub temperature: f32,
    /// Always use the offline mock oracle.
    pub mock: bool,
    /// Fold system messages into the next user message. `None` follows the model.
    pub fold_system_messages: Option<bool>,
}

impl Default for FileOracleConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            model: "google/gemini-2.0-flash-001".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            timeout_seconds: 60,
            temperature: 0.2,
            mock: false,
            fold_system_messages: None,
        }
    }
}

impl FileOracleConfig {
    /// API key from the configured environment variable, if set and non-empty
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}
