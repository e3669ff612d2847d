//! Market data backend configuration from TOML (`[backend]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBackendConfig {
    /// Base URL of the market data API
    pub base_url: String,
    pub timeout_seconds: u64,
    /// Environment variable holding the bearer token (default: "BACKEND_API_TOKEN")
    pub token_env: String,
}

impl Default for FileBackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_seconds: 10,
            token_env: "BACKEND_API_TOKEN".to_string(),
        }
    }
}

impl FileBackendConfig {
    pub fn token(&self) -> Option<String> {
        std::env::var(&self.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty())
    }
}
