//! Decomposition parsing from oracle responses.
//!
//! Expected schema:
//! ```json
//! {
//!   "subquestions": [
//!     {"id": 1, "question": "...", "depends_on": []},
//!     {"id": 2, "question": "... {{TICKER_FROM_Q1}}", "depends_on": [1]}
//!   ]
//! }
//! ```
//! A bare array of sub-questions is also accepted. Ids may be numbers or
//! numeric strings.

use super::node::{NodeId, SubQuestionNode};
use crate::util::strip_code_fences;
use serde_json::Value;
use thiserror::Error;

/// Why an oracle decomposition could not be used
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecompositionParseError {
    #[error("response is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("response has no sub-question list")]
    MissingList,

    #[error("sub-question list is empty")]
    Empty,

    #[error("sub-question #{index} is malformed: {reason}")]
    MalformedEntry { index: usize, reason: String },
}

/// Parse the oracle's decomposition text into nodes.
///
/// Nodes come back in response order. Duplicate ids are kept so that
/// scheduling can reject the plan.
pub fn parse_subquestions(raw: &str) -> Result<Vec<SubQuestionNode>, DecompositionParseError> {
    let cleaned = strip_code_fences(raw);
    let json: Value = serde_json::from_str(cleaned)
        .map_err(|e| DecompositionParseError::InvalidJson(e.to_string()))?;

    let entries = match &json {
        Value::Array(items) => items,
        Value::Object(obj) => obj
            .get("subquestions")
            .or_else(|| obj.get("sub_questions"))
            .and_then(|v| v.as_array())
            .ok_or(DecompositionParseError::MissingList)?,
        _ => return Err(DecompositionParseError::MissingList),
    };

    if entries.is_empty() {
        return Err(DecompositionParseError::Empty);
    }

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            parse_entry(entry)
                .map_err(|reason| DecompositionParseError::MalformedEntry { index, reason })
        })
        .collect()
}

/// The single-node plan used when decomposition fails
pub fn fallback_plan(query: &str) -> Vec<SubQuestionNode> {
    vec![SubQuestionNode::new(1, query)]
}

fn parse_entry(entry: &Value) -> Result<SubQuestionNode, String> {
    let id = entry
        .get("id")
        .and_then(json_value_to_id)
        .ok_or_else(|| "missing or invalid id".to_string())?;

    let text = entry
        .get("question")
        .or_else(|| entry.get("text"))
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("sub-question {} has no question text", id))?;

    let deps = match entry.get("depends_on") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| json_value_to_id(v).ok_or_else(|| format!("sub-question {} has a non-numeric dependency", id)))
            .collect::<Result<Vec<_>, _>>()?,
        Some(single) => vec![
            json_value_to_id(single)
                .ok_or_else(|| format!("sub-question {} has a non-numeric dependency", id))?,
        ],
    };

    Ok(SubQuestionNode::new(id, text).with_depends_on(deps))
}

fn json_value_to_id(value: &Value) -> Option<NodeId> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| NodeId::try_from(n).ok()),
        Value::String(s) => s.trim().trim_start_matches(['Q', 'q']).parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{GraphError, schedule};

    #[test]
    fn test_parse_fpt_decomposition() {
        let raw = r#"```json
{
  "subquestions": [
    {"id": 1, "question": "What is the ticker for FPT?", "depends_on": []},
    {"id": 2, "question": "What is the current price of {{TICKER_FROM_Q1}}?", "depends_on": [1]}
  ]
}
```"#;
        let nodes = parse_subquestions(raw).unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1].text, "What is the current price of {{TICKER_FROM_Q1}}?");
        assert_eq!(nodes[1].depends_on, vec![1]);
    }

    #[test]
    fn test_string_ids_and_missing_deps() {
        let raw = r#"[{"id": "1", "question": "a"}, {"id": "Q2", "question": "b", "depends_on": ["1"]}]"#;
        let nodes = parse_subquestions(raw).unwrap();
        assert_eq!(nodes[0].id, 1);
        assert!(nodes[0].depends_on.is_empty());
        assert_eq!(nodes[1].id, 2);
        assert_eq!(nodes[1].depends_on, vec![1]);
    }

    #[test]
    fn test_duplicate_ids_are_kept() {
        let raw = r#"{"subquestions": [{"id": 1, "question": "a"}, {"id": 1, "question": "b"}]}"#;
        let nodes = parse_subquestions(raw).unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].text, "a");
        assert_eq!(nodes[1].text, "b");
        assert_eq!(schedule(&nodes).unwrap_err(), GraphError::DuplicateId(1));
    }

    #[test]
    fn test_invalid_json() {
        let err = parse_subquestions("Sure! Here are the steps: first...").unwrap_err();
        assert!(matches!(err, DecompositionParseError::InvalidJson(_)));
    }

    #[test]
    fn test_missing_and_empty_list() {
        assert_eq!(
            parse_subquestions(r#"{"steps": []}"#).unwrap_err(),
            DecompositionParseError::MissingList
        );
        assert_eq!(
            parse_subquestions(r#"{"subquestions": []}"#).unwrap_err(),
            DecompositionParseError::Empty
        );
    }

    #[test]
    fn test_malformed_entry() {
        let err = parse_subquestions(r#"{"subquestions": [{"id": 1}]}"#).unwrap_err();
        assert!(matches!(err, DecompositionParseError::MalformedEntry { index: 0, .. }));
    }

    #[test]
    fn test_fallback_plan() {
        let plan = fallback_plan("Find the ticker and price for FPT");
        assert_eq!(plan, vec![SubQuestionNode::new(1, "Find the ticker and price for FPT")]);
    }
}
