//! Market data backend HTTP client

use std::time::Duration;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::FileBackendConfig;
use orchestrator_domain::ToolError;

const TICKER_DETAIL_PATH: &str = "/api/v1/market/ticker-detail";

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    #[error("Cannot connect to backend server: {0}")]
    Connection(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl From<BackendError> for ToolError {
    fn from(e: BackendError) -> Self {
        ToolError::execution_failed(e.to_string())
    }
}

/// Thin client for the market data REST API
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            timeout,
        }
    }

    pub fn from_config(config: &FileBackendConfig) -> Self {
        let client = Self::new(&config.base_url, Duration::from_secs(config.timeout_seconds));
        match config.token() {
            Some(token) => client.with_token(token),
            None => client,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Ticker detail; `close` is copied into `price` when the latter is absent
    pub async fn ticker_detail(&self, symbol: &str) -> Result<Map<String, Value>, BackendError> {
        let url = format!("{}{}", self.base_url, TICKER_DETAIL_PATH);
        debug!(url = %url, symbol, "Backend request");

        let mut request = self
            .http
            .get(&url)
            .query(&[("symbol", symbol)])
            .timeout(self.timeout);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| self.classify(e))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), url = %url, "Backend HTTP error");
            return Err(BackendError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let value: Value = response.json().await.map_err(|e| self.classify(e))?;
        let Value::Object(mut data) = value else {
            return Err(BackendError::Decode("expected a JSON object".to_string()));
        };
        if !data.contains_key("price") {
            if let Some(close) = data.get("close").cloned() {
                data.insert("price".to_string(), close);
            }
        }
        Ok(data)
    }

    fn classify(&self, e: reqwest::Error) -> BackendError {
        if e.is_timeout() {
            BackendError::Timeout(self.timeout)
        } else if e.is_connect() {
            BackendError::Connection(e.to_string())
        } else {
            BackendError::Decode(e.to_string())
        }
    }
}
