//! OpenAI-compatible chat completions oracle
//!
//! Works against any gateway that speaks `POST {base_url}/chat/completions`
//! (OpenRouter, OpenAI, local servers). Tools are sent in the `tools` array
//! with `tool_choice: "auto"`; the reply's first `tool_calls[].function` or
//! legacy `function_call` becomes the directive.

use std::time::Duration;

use async_trait::async_trait;
use orchestrator_application::ports::oracle::{Oracle, OracleError};
use orchestrator_domain::oracle::fold_system_messages;
use orchestrator_domain::{FunctionCall, Message, Model, OracleResponse, ToolDefinition};
use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::FileOracleConfig;
use crate::tools::function_schemas;

#[derive(Error, Debug)]
pub enum OpenAiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Malformed completion: {0}")]
    Malformed(String),
}

impl OpenAiError {
    /// Map onto the port error; rate limits and server errors count as transport
    pub fn into_oracle_error(self, timeout: Duration) -> OracleError {
        match self {
            OpenAiError::Request(e) if e.is_timeout() => OracleError::Timeout(timeout),
            OpenAiError::Request(e) if e.is_decode() => OracleError::Parse(e.to_string()),
            OpenAiError::Request(e) => OracleError::Transport(e.to_string()),
            OpenAiError::Api { status, message } if status == 429 || status >= 500 => {
                OracleError::Transport(format!("HTTP {}: {}", status, message))
            }
            e @ OpenAiError::Api { .. } => OracleError::Other(e.to_string()),
            OpenAiError::Malformed(msg) => OracleError::Parse(msg),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCallPayload>>,
    #[serde(default)]
    function_call: Option<FunctionPayload>,
}

#[derive(Debug, Deserialize)]
struct ToolCallPayload {
    function: FunctionPayload,
}

#[derive(Debug, Deserialize)]
struct FunctionPayload {
    name: String,
    #[serde(default)]
    arguments: Value,
}

pub struct OpenAiCompatOracle {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: Model,
    temperature: f32,
    timeout: Duration,
    fold_system: bool,
}

impl OpenAiCompatOracle {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, model: Model) -> Self {
        let fold_system = model.folds_system_messages();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model,
            temperature: 0.2,
            timeout: Duration::from_secs(60),
            fold_system,
        }
    }

    pub fn from_config(config: &FileOracleConfig, api_key: impl Into<String>) -> Self {
        let model: Model = config.model.parse().unwrap_or_default();
        let oracle = Self::new(&config.base_url, api_key, model)
            .with_temperature(config.temperature)
            .with_timeout(Duration::from_secs(config.timeout_seconds));
        match config.fold_system_messages {
            Some(fold) => oracle.with_fold_system_messages(fold),
            None => oracle,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_fold_system_messages(mut self, fold: bool) -> Self {
        self.fold_system = fold;
        self
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    fn build_request(&self, messages: &[Message], tools: Option<&[ToolDefinition]>) -> Value {
        let messages = if self.fold_system {
            fold_system_messages(messages)
        } else {
            messages.to_vec()
        };

        let mut body = json!({
            "model": self.model.as_str(),
            "temperature": self.temperature,
            "messages": messages,
        });
        if let Some(tools) = tools.filter(|t| !t.is_empty()) {
            body["tools"] = json!(function_schemas(tools));
            body["tool_choice"] = json!("auto");
        }
        body
    }

    async fn complete(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
    ) -> Result<OracleResponse, OpenAiError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.build_request(messages, tools);
        debug!(
            model = %self.model,
            message_count = messages.len(),
            tool_count = tools.map_or(0, <[ToolDefinition]>::len),
            "Sending chat completion"
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(OpenAiError::Api {
                status: status.as_u16(),
                message: parse_api_error(&body_text),
            });
        }

        let completion: CompletionResponse = response.json().await?;
        parse_completion(completion)
    }
}

fn parse_api_error(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| json["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| body.to_string())
}

fn parse_completion(completion: CompletionResponse) -> Result<OracleResponse, OpenAiError> {
    let choice = completion
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| OpenAiError::Malformed("no choices in response".to_string()))?;
    let message = choice.message;

    let function = message
        .tool_calls
        .and_then(|calls| calls.into_iter().next())
        .map(|call| call.function)
        .or(message.function_call)
        .filter(|f| !f.name.trim().is_empty());

    Ok(OracleResponse {
        text: message.content,
        function_call: function.map(|f| FunctionCall::new(f.name, f.arguments)),
    })
}

#[async_trait]
impl Oracle for OpenAiCompatOracle {
    async fn generate(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
    ) -> Result<OracleResponse, OracleError> {
        self.complete(messages, tools).await.map_err(|e| {
            warn!(model = %self.model, error = %e, "Chat completion failed");
            e.into_oracle_error(self.timeout)
        })
    }

    fn name(&self) -> &str {
        self.model.as_str()
    }
}
