//! Currency conversion from a static rate table

use async_trait::async_trait;
use chrono::Utc;
use orchestrator_domain::{Tool, ToolCall, ToolDefinition, ToolError, ToolParameter};
use serde_json::{Value, json};

pub const NAME: &str = "get_currency_rate";

/// Approximate reference rates; the inverse pair is derived
const STATIC_RATES: &[(&str, &str, f64)] = &[
    ("USD", "VND", 24500.0),
    ("EUR", "USD", 1.08),
    ("GBP", "USD", 1.27),
    ("JPY", "USD", 0.0067),
    ("USD", "CNY", 7.24),
    ("USD", "SGD", 1.34),
    ("USD", "THB", 35.5),
    ("USD", "KRW", 1340.0),
];

/// Rate for `from` → `to`, trying the direct pair then the inverse
pub fn lookup_rate(from: &str, to: &str) -> Option<f64> {
    if from == to {
        return Some(1.0);
    }
    STATIC_RATES.iter().find_map(|(a, b, rate)| {
        if *a == from && *b == to {
            Some(*rate)
        } else if *a == to && *b == from {
            Some(1.0 / rate)
        } else {
            None
        }
    })
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Four decimals, or eight for rates that would otherwise round to zero
fn round_rate(rate: f64) -> f64 {
    let rounded = round_to(rate, 4);
    if rounded == 0.0 && rate != 0.0 {
        round_to(rate, 8)
    } else {
        rounded
    }
}

pub struct CurrencyRateTool {
    definition: ToolDefinition,
}

impl CurrencyRateTool {
    pub fn new() -> Self {
        Self {
            definition: ToolDefinition::new(
                NAME,
                "Exchange rate between two currencies and the converted amount",
            )
            .with_parameter(ToolParameter::new(
                "from_currency",
                "Source currency code (default USD)",
                false,
            ))
            .with_parameter(ToolParameter::new(
                "to_currency",
                "Target currency code (default VND)",
                false,
            ))
            .with_parameter(
                ToolParameter::new("amount", "Amount to convert (default 1)", false)
                    .with_type("number"),
            ),
        }
    }
}

impl Default for CurrencyRateTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for CurrencyRateTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn invoke(&self, call: &ToolCall) -> Result<Value, ToolError> {
        let from = call.get_string("from_currency").unwrap_or("USD").to_uppercase();
        let to = call.get_string("to_currency").unwrap_or("VND").to_uppercase();
        let amount = match call.arguments.get("amount") {
            None | Some(Value::Null) => 1.0,
            Some(_) => call
                .get_f64("amount")
                .ok_or_else(|| ToolError::invalid_argument("amount must be a number"))?,
        };

        let rate = lookup_rate(&from, &to).ok_or_else(|| {
            ToolError::execution_failed(format!(
                "Could not find exchange rate for {} to {}",
                from, to
            ))
        })?;
        let source = if from == to { "same_currency" } else { "static_table" };

        Ok(json!({
            "from_currency": from,
            "to_currency": to,
            "rate": round_rate(rate),
            "amount": amount,
            "converted_amount": round_to(amount * rate, 2),
            "timestamp": Utc::now().to_rfc3339(),
            "source": source,
        }))
    }
}
