//! Argument parsing and normalization for oracle-issued tool calls.
//!
//! The oracle sends arguments either as a JSON object or as a string that
//! may be fenced JSON or loose `key=value` pairs. Keys are then mapped onto
//! the target tool's declared parameters.

use super::entities::ToolDefinition;
use crate::util::strip_code_fences;
use serde_json::{Map, Value};

/// Known argument synonyms, mapped to canonical parameter names.
pub const ARGUMENT_ALIASES: &[(&str, &str)] = &[
    ("ticker_symbol", "ticker"),
    ("stock_ticker", "ticker"),
    ("stock_symbol", "ticker"),
    ("symbol", "ticker"),
    ("company", "company_name"),
    ("name", "company_name"),
    ("country_name", "country"),
    ("metric", "indicator"),
    ("q", "query"),
    ("base_currency", "from_currency"),
    ("target_currency", "to_currency"),
];

/// Resolve an argument key through the alias table (case-insensitive).
pub fn canonical_alias(key: &str) -> Option<&'static str> {
    let lower = key.to_lowercase();
    ARGUMENT_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lower)
        .map(|(_, canonical)| *canonical)
}

/// Turn a raw argument payload into a flat map.
///
/// Objects pass through. Strings have code fences stripped and are decoded
/// as JSON; if that fails they are split on `,` `;` or newline and then on
/// the first `=`. Anything else yields an empty map.
pub fn parse_arguments(raw: &Value) -> Map<String, Value> {
    match raw {
        Value::Object(map) => map.clone(),
        Value::String(s) => parse_argument_string(s),
        _ => Map::new(),
    }
}

fn parse_argument_string(raw: &str) -> Map<String, Value> {
    let cleaned = strip_code_fences(raw);
    if cleaned.is_empty() {
        return Map::new();
    }

    if let Ok(value) = serde_json::from_str::<Value>(cleaned) {
        if let Value::Object(map) = value {
            return map;
        }
    }

    cleaned
        .split([',', ';', '\n'])
        .filter_map(|part| {
            let (key, value) = part.split_once('=')?;
            let key = key.trim().trim_matches(|c| c == '"' || c == '\'');
            if key.is_empty() {
                return None;
            }
            let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
            Some((key.to_string(), Value::String(value.to_string())))
        })
        .collect()
}

/// Map raw argument keys onto `definition`'s declared parameters.
///
/// Per key, in order: exact match, case-insensitive match, alias table.
/// Keys that match nothing are dropped. When nothing matched and the tool
/// declares exactly one parameter, the first supplied value is bound to it.
pub fn normalize_arguments(raw: &Map<String, Value>, definition: &ToolDefinition) -> Map<String, Value> {
    let mut normalized = Map::new();

    // Exact matches first so they win over aliases of the same parameter
    for (key, value) in raw {
        if definition.has_parameter(key) {
            normalized.insert(key.clone(), value.clone());
        }
    }

    for (key, value) in raw {
        if definition.has_parameter(key) {
            continue;
        }
        let target = definition
            .parameter_names()
            .find(|p| p.eq_ignore_ascii_case(key))
            .or_else(|| canonical_alias(key).filter(|c| definition.has_parameter(c)));

        if let Some(target) = target {
            if !normalized.contains_key(target) {
                normalized.insert(target.to_string(), value.clone());
            }
        }
    }

    if normalized.is_empty() && definition.parameters.len() == 1 {
        if let Some(value) = raw.values().next() {
            normalized.insert(definition.parameters[0].name.clone(), value.clone());
        }
    }

    normalized
}
