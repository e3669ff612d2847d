//! Macroeconomic snapshot per country

use async_trait::async_trait;
use chrono::Utc;
use orchestrator_domain::{Tool, ToolCall, ToolDefinition, ToolError, ToolParameter};
use serde_json::{Map, Value, json};

pub const NAME: &str = "get_macro_data";

pub const INDICATORS: &[&str] = &["gdp_growth", "inflation_cpi", "unemployment", "interest_rate"];

struct CountrySnapshot {
    code: &'static str,
    country: &'static str,
    /// Values in percent, in `INDICATORS` order
    values: [f64; 4],
    last_updated: &'static str,
}

impl CountrySnapshot {
    fn value(&self, indicator: &str) -> Option<f64> {
        INDICATORS
            .iter()
            .position(|i| *i == indicator)
            .map(|idx| self.values[idx])
    }

    fn indicators(&self) -> Map<String, Value> {
        INDICATORS
            .iter()
            .zip(self.values)
            .map(|(name, value)| (name.to_string(), json!(value)))
            .collect()
    }
}

const SNAPSHOTS: &[CountrySnapshot] = &[
    CountrySnapshot {
        code: "US",
        country: "United States",
        values: [2.5, 3.2, 3.7, 5.25],
        last_updated: "2024-Q4",
    },
    CountrySnapshot {
        code: "VN",
        country: "Vietnam",
        values: [6.5, 3.8, 2.3, 4.5],
        last_updated: "2024-Q4",
    },
    CountrySnapshot {
        code: "CN",
        country: "China",
        values: [5.0, 0.5, 5.1, 3.45],
        last_updated: "2024-Q4",
    },
    CountrySnapshot {
        code: "JP",
        country: "Japan",
        values: [1.2, 2.8, 2.5, -0.1],
        last_updated: "2024-Q4",
    },
    CountrySnapshot {
        code: "EU",
        country: "European Union",
        values: [0.8, 2.9, 6.5, 4.0],
        last_updated: "2024-Q4",
    },
];

/// Map a country name or code onto a snapshot code
pub fn country_code(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    let code = match lowered.as_str() {
        "vietnam" | "việt nam" | "viet nam" => "VN",
        "united states" | "usa" | "america" => "US",
        "china" => "CN",
        "japan" => "JP",
        "european union" | "europe" | "eurozone" => "EU",
        _ => return lowered.to_uppercase(),
    };
    code.to_string()
}

/// Map indicator synonyms onto canonical indicator names
pub fn canonical_indicator(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    let canonical = match lowered.as_str() {
        "inflation" | "cpi" | "lạm phát" => "inflation_cpi",
        "gdp" | "gdp growth" | "tăng trưởng gdp" => "gdp_growth",
        "unemployment rate" | "thất nghiệp" => "unemployment",
        "interest" | "interest rate" | "lãi suất" => "interest_rate",
        _ => return lowered.replace(' ', "_"),
    };
    canonical.to_string()
}

pub struct MacroDataTool {
    definition: ToolDefinition,
}

impl MacroDataTool {
    pub fn new() -> Self {
        Self {
            definition: ToolDefinition::new(
                NAME,
                "Macroeconomic indicators (GDP growth, CPI inflation, unemployment, interest rate) for a country",
            )
            .with_parameter(ToolParameter::new(
                "country",
                "Country code or name: US, VN, CN, JP or EU (default US)",
                false,
            ))
            .with_parameter(ToolParameter::new(
                "indicator",
                "One indicator to return; all indicators when omitted",
                false,
            )),
        }
    }
}

impl Default for MacroDataTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for MacroDataTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn invoke(&self, call: &ToolCall) -> Result<Value, ToolError> {
        let code = country_code(call.get_string("country").unwrap_or("US"));
        let snapshot = SNAPSHOTS.iter().find(|s| s.code == code).ok_or_else(|| {
            let available: Vec<_> = SNAPSHOTS.iter().map(|s| s.code).collect();
            ToolError::execution_failed(format!("Country code '{}' not found", code))
                .with_details(format!("available: {}", available.join(", ")))
        })?;

        let Some(raw_indicator) = call.get_string("indicator") else {
            return Ok(json!({
                "country_code": snapshot.code,
                "country": snapshot.country,
                "data": snapshot.indicators(),
                "last_updated": snapshot.last_updated,
                "source": "static_data",
                "timestamp": Utc::now().to_rfc3339(),
            }));
        };

        let indicator = canonical_indicator(raw_indicator);
        let value = snapshot.value(&indicator).ok_or_else(|| {
            ToolError::execution_failed(format!("Indicator '{}' not found", indicator))
                .with_details(format!("available: {}", INDICATORS.join(", ")))
        })?;

        Ok(json!({
            "country_code": snapshot.code,
            "country": snapshot.country,
            "indicator": indicator,
            "value": value,
            "last_updated": snapshot.last_updated,
            "source": "static_data",
            "timestamp": Utc::now().to_rfc3339(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_single_indicator_by_alias() {
        let result = MacroDataTool::new()
            .invoke(
                &ToolCall::new(NAME)
                    .with_arg("country", "Vietnam")
                    .with_arg("indicator", "lạm phát"),
            )
            .await
            .unwrap();
        assert_eq!(result["country_code"], "VN");
        assert_eq!(result["indicator"], "inflation_cpi");
        assert_eq!(result["value"], json!(3.8));
    }

    #[tokio::test]
    async fn test_all_indicators_default_country() {
        let result = MacroDataTool::new().invoke(&ToolCall::new(NAME)).await.unwrap();
        assert_eq!(result["country_code"], "US");
        assert_eq!(result["data"]["interest_rate"], json!(5.25));
        assert_eq!(result["data"].as_object().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_unknown_country_and_indicator() {
        let tool = MacroDataTool::new();
        let err = tool
            .invoke(&ToolCall::new(NAME).with_arg("country", "Atlantis"))
            .await
            .unwrap_err();
        assert!(err.message.contains("ATLANTIS"));

        let err = tool
            .invoke(&ToolCall::new(NAME).with_arg("indicator", "housing starts"))
            .await
            .unwrap_err();
        assert!(err.message.contains("housing_starts"));
    }
}
