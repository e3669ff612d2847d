//! Placeholder resolution between sub-questions.
//!
//! A node's text may reference data produced by an earlier node through
//! tokens such as `{{TICKER_FROM_Q1}}`. Resolution tries, in order:
//!
//! 1. a case-insensitive key in the upstream record's `extracted_data`
//! 2. a case-insensitive key in the upstream answer text, if it is a JSON object
//! 3. a best-effort token taken from the answer text (after the last `:`,
//!    otherwise the first word)
//!
//! Tokens that cannot be resolved are left in place and reported as missing.

use super::answer::{AnswerBook, AnswerRecord};
use super::node::NodeId;
use regex::{Captures, Regex};
use serde_json::{Map, Value};
use std::sync::LazyLock;

static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Z0-9_]+)\s*\}\}").expect("placeholder token pattern is valid")
});

static KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)_FROM_Q(\d+)$").expect("placeholder key pattern is valid"));

/// Result of resolving one node's text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub text: String,
    /// Unresolved token keys in order of appearance (e.g. `TICKER_FROM_Q1`)
    pub missing: Vec<String>,
}

impl Resolution {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// A parsed placeholder key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderKey {
    pub field: String,
    pub node: NodeId,
}

impl PlaceholderKey {
    /// Parse `FIELD_FROM_Qn`
    pub fn parse(key: &str) -> Option<Self> {
        let caps = KEY_PATTERN.captures(key)?;
        let node = caps.get(2)?.as_str().parse().ok()?;
        Some(Self {
            field: caps.get(1)?.as_str().to_string(),
            node,
        })
    }
}

/// List the placeholder keys present in `text`, in order of appearance
pub fn extract_placeholders(text: &str) -> Vec<String> {
    TOKEN_PATTERN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Substitute placeholder tokens in `text` using already-produced answers.
///
/// Skipped and errored records supply no values.
pub fn resolve_placeholders(text: &str, answers: &AnswerBook) -> Resolution {
    let mut missing = Vec::new();

    let resolved = TOKEN_PATTERN.replace_all(text, |caps: &Captures<'_>| {
        let token = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
        let key = caps.get(1).map(|m| m.as_str()).unwrap_or_default();

        let value = PlaceholderKey::parse(key).and_then(|parsed| {
            answers
                .get(parsed.node)
                .filter(|record| record.is_ok())
                .and_then(|record| lookup_field(record, &parsed.field))
        });

        match value {
            Some(value) => value,
            None => {
                missing.push(key.to_string());
                token.to_string()
            }
        }
    });

    Resolution {
        text: resolved.into_owned(),
        missing,
    }
}

fn lookup_field(record: &AnswerRecord, field: &str) -> Option<String> {
    if let Some(value) = lookup_in_map(record.extracted_data(), field) {
        return Some(value);
    }

    let text = record.text().trim();
    if let Ok(Value::Object(structured)) = serde_json::from_str::<Value>(text) {
        if let Some(value) = lookup_in_map(&structured, field) {
            return Some(value);
        }
    }

    heuristic_token(text)
}

fn lookup_in_map(map: &Map<String, Value>, field: &str) -> Option<String> {
    let value = map.get(&field.to_lowercase()).or_else(|| map.get(field)).or_else(|| {
        map.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(field))
            .map(|(_, v)| v)
    })?;
    value_to_text(value)
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

fn heuristic_token(text: &str) -> Option<String> {
    let tail = match text.rfind(':') {
        Some(pos) => &text[pos + 1..],
        None => text,
    };
    tail.split_whitespace().next().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn book_with(record: AnswerRecord) -> AnswerBook {
        let mut book = AnswerBook::new();
        book.insert(record);
        book
    }

    fn data(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_resolves_from_extracted_data() {
        let book = book_with(AnswerRecord::answered(
            1,
            "ticker?",
            "The ticker is FPT",
            vec!["get_stock_symbol".to_string()],
            data(&[("ticker", json!("FPT"))]),
        ));
        let resolution = resolve_placeholders("Price of {{TICKER_FROM_Q1}}", &book);
        assert_eq!(resolution.text, "Price of FPT");
        assert!(resolution.is_complete());
    }

    #[test]
    fn test_missing_record_leaves_text_unchanged() {
        let resolution = resolve_placeholders("Price of {{TICKER_FROM_Q1}}", &AnswerBook::new());
        assert_eq!(resolution.text, "Price of {{TICKER_FROM_Q1}}");
        assert_eq!(resolution.missing, vec!["TICKER_FROM_Q1".to_string()]);
    }

    #[test]
    fn test_whitespace_inside_braces() {
        let book = book_with(AnswerRecord::answered(
            1,
            "q",
            "",
            vec![],
            data(&[("ticker", json!("FPT"))]),
        ));
        let resolution = resolve_placeholders("Price of {{ TICKER_FROM_Q1 }}", &book);
        assert_eq!(resolution.text, "Price of FPT");
    }

    #[test]
    fn test_case_insensitive_key_match() {
        let book = book_with(AnswerRecord::answered(
            2,
            "q",
            "",
            vec![],
            data(&[("Close_Price", json!(120500))]),
        ));
        let resolution = resolve_placeholders("Compare {{CLOSE_PRICE_FROM_Q2}}", &book);
        assert_eq!(resolution.text, "Compare 120500");
    }

    #[test]
    fn test_structured_answer_text() {
        let book = book_with(AnswerRecord::answered(
            1,
            "q",
            r#"{"exchange": "HOSE"}"#,
            vec![],
            Map::new(),
        ));
        let resolution = resolve_placeholders("Hours of {{EXCHANGE_FROM_Q1}}", &book);
        assert_eq!(resolution.text, "Hours of HOSE");
    }

    #[test]
    fn test_heuristic_after_last_colon() {
        let book = book_with(AnswerRecord::answered(
            1,
            "q",
            "Company: FPT Corp, ticker: FPT now",
            vec![],
            Map::new(),
        ));
        let resolution = resolve_placeholders("{{TICKER_FROM_Q1}}", &book);
        assert_eq!(resolution.text, "FPT");
    }

    #[test]
    fn test_heuristic_first_word() {
        let book = book_with(AnswerRecord::answered(1, "q", "VCB is the ticker", vec![], Map::new()));
        let resolution = resolve_placeholders("{{TICKER_FROM_Q1}}", &book);
        assert_eq!(resolution.text, "VCB");
    }

    #[test]
    fn test_empty_text_without_data_is_missing() {
        let book = book_with(AnswerRecord::answered(1, "q", "   ", vec![], Map::new()));
        let resolution = resolve_placeholders("{{TICKER_FROM_Q1}}", &book);
        assert_eq!(resolution.missing, vec!["TICKER_FROM_Q1".to_string()]);
    }

    #[test]
    fn test_malformed_key_is_missing() {
        let resolution = resolve_placeholders("Value {{TICKER}}", &AnswerBook::new());
        assert_eq!(resolution.text, "Value {{TICKER}}");
        assert_eq!(resolution.missing, vec!["TICKER".to_string()]);
    }

    #[test]
    fn test_missing_keys_keep_order() {
        let resolution =
            resolve_placeholders("{{B_FROM_Q2}} and {{A_FROM_Q1}}", &AnswerBook::new());
        assert_eq!(
            resolution.missing,
            vec!["B_FROM_Q2".to_string(), "A_FROM_Q1".to_string()]
        );
    }

    #[test]
    fn test_lowercase_token_is_not_placeholder() {
        let resolution = resolve_placeholders("{{ticker_from_q1}}", &AnswerBook::new());
        assert!(resolution.is_complete());
    }

    #[test]
    fn test_extract_placeholders() {
        assert_eq!(
            extract_placeholders("{{TICKER_FROM_Q1}} vs {{ PRICE_FROM_Q2 }}"),
            vec!["TICKER_FROM_Q1".to_string(), "PRICE_FROM_Q2".to_string()]
        );
    }

    #[test]
    fn test_parse_key() {
        let key = PlaceholderKey::parse("CLOSE_PRICE_FROM_Q12").unwrap();
        assert_eq!(key.field, "CLOSE_PRICE");
        assert_eq!(key.node, 12);
        assert!(PlaceholderKey::parse("TICKER").is_none());
    }

    #[test]
    fn test_failed_record_supplies_nothing() {
        let mut book = AnswerBook::new();
        book.insert(AnswerRecord::tool_failed(1, "q", "get_stock_symbol", "timeout: backend"));
        let resolution = resolve_placeholders("Price of {{TICKER_FROM_Q1}}", &book);
        assert_eq!(resolution.missing, vec!["TICKER_FROM_Q1".to_string()]);
    }
}
