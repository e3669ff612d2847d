//! Oracle response types.
//!
//! An oracle reply carries free text, a structured function-call directive,
//! or both. Arguments of the directive are kept as raw JSON because
//! providers send them either as an object or as a JSON-encoded string.

use crate::util::strip_code_fences;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A function-call directive issued by the oracle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// Either a JSON object or a string that still needs parsing.
    #[serde(default)]
    pub arguments: Value,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    fn from_json(value: &Value) -> Option<Self> {
        let name = value.get("name")?.as_str()?;
        if name.trim().is_empty() {
            return None;
        }
        let arguments = value.get("arguments").cloned().unwrap_or(Value::Null);
        Some(Self::new(name, arguments))
    }
}

/// Response from a single oracle `generate` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OracleResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
}

impl OracleResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            function_call: None,
        }
    }

    pub fn function_call(call: FunctionCall) -> Self {
        Self {
            text: None,
            function_call: Some(call),
        }
    }

    /// Text content, or empty string when the oracle returned none.
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Whether the reply has no usable text.
    pub fn is_blank(&self) -> bool {
        self.text_or_empty().trim().is_empty()
    }

    /// The function-call directive, if any.
    ///
    /// Falls back to a directive embedded in the text, either wrapped as
    /// `{"function_call": {...}}` or bare `{"name": ..., "arguments": ...}`.
    pub fn directive(&self) -> Option<FunctionCall> {
        if let Some(call) = &self.function_call {
            return Some(call.clone());
        }
        let text = self.text.as_deref()?;
        let parsed: Value = serde_json::from_str(strip_code_fences(text)).ok()?;
        match parsed.get("function_call") {
            Some(inner) => FunctionCall::from_json(inner),
            None if parsed.get("arguments").is_some() => FunctionCall::from_json(&parsed),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_structured_directive_wins() {
        let response = OracleResponse {
            text: Some("ignored".to_string()),
            function_call: Some(FunctionCall::new("get_stock_price", json!({"ticker": "FPT"}))),
        };
        assert_eq!(response.directive().unwrap().name, "get_stock_price");
    }

    #[test]
    fn test_wrapped_directive_in_text() {
        let response = OracleResponse::text(
            "```json\n{\"function_call\": {\"name\": \"get_stock_symbol\", \"arguments\": \"{\\\"company_name\\\": \\\"FPT\\\"}\"}}\n```",
        );
        let call = response.directive().unwrap();
        assert_eq!(call.name, "get_stock_symbol");
        assert!(call.arguments.is_string());
    }

    #[test]
    fn test_bare_directive_in_text() {
        let response =
            OracleResponse::text(r#"{"name": "get_exchange_info", "arguments": {"exchange": "HOSE"}}"#);
        let call = response.directive().unwrap();
        assert_eq!(call.name, "get_exchange_info");
        assert_eq!(call.arguments["exchange"], "HOSE");
    }

    #[test]
    fn test_plain_text_has_no_directive() {
        assert!(OracleResponse::text("FPT trades at 120,000 VND").directive().is_none());
        assert!(OracleResponse::text(r#"{"ticker": "FPT"}"#).directive().is_none());
    }

    #[test]
    fn test_blank() {
        assert!(OracleResponse::default().is_blank());
        assert!(OracleResponse::text("  ").is_blank());
        assert!(!OracleResponse::text("ok").is_blank());
    }
}
