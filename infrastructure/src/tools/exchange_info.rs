//! Static stock exchange reference table

use async_trait::async_trait;
use chrono::Utc;
use orchestrator_domain::{Tool, ToolCall, ToolDefinition, ToolError, ToolParameter};
use serde::Serialize;
use serde_json::{Value, json};

pub const NAME: &str = "get_exchange_info";

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Exchange {
    #[serde(skip)]
    pub code: &'static str,
    pub full_name: &'static str,
    pub country: &'static str,
    pub country_code: &'static str,
    pub timezone: &'static str,
    pub utc_offset: &'static str,
    pub currency: &'static str,
    pub trading_hours: &'static str,
    pub website: &'static str,
    pub established: u16,
}

pub const EXCHANGES: &[Exchange] = &[
    Exchange {
        code: "HOSE",
        full_name: "Ho Chi Minh Stock Exchange",
        country: "Vietnam",
        country_code: "VN",
        timezone: "Asia/Ho_Chi_Minh",
        utc_offset: "+07:00",
        currency: "VND",
        trading_hours: "09:00-15:00",
        website: "https://www.hsx.vn",
        established: 2000,
    },
    Exchange {
        code: "HNX",
        full_name: "Hanoi Stock Exchange",
        country: "Vietnam",
        country_code: "VN",
        timezone: "Asia/Ho_Chi_Minh",
        utc_offset: "+07:00",
        currency: "VND",
        trading_hours: "09:00-15:00",
        website: "https://www.hnx.vn",
        established: 2005,
    },
    Exchange {
        code: "UPCOM",
        full_name: "Unlisted Public Company Market",
        country: "Vietnam",
        country_code: "VN",
        timezone: "Asia/Ho_Chi_Minh",
        utc_offset: "+07:00",
        currency: "VND",
        trading_hours: "09:00-15:00",
        website: "https://www.hnx.vn",
        established: 2009,
    },
    Exchange {
        code: "NYSE",
        full_name: "New York Stock Exchange",
        country: "United States",
        country_code: "US",
        timezone: "America/New_York",
        utc_offset: "-05:00",
        currency: "USD",
        trading_hours: "09:30-16:00 EST",
        website: "https://www.nyse.com",
        established: 1792,
    },
    Exchange {
        code: "NASDAQ",
        full_name: "NASDAQ Stock Market",
        country: "United States",
        country_code: "US",
        timezone: "America/New_York",
        utc_offset: "-05:00",
        currency: "USD",
        trading_hours: "09:30-16:00 EST",
        website: "https://www.nasdaq.com",
        established: 1971,
    },
    Exchange {
        code: "LSE",
        full_name: "London Stock Exchange",
        country: "United Kingdom",
        country_code: "GB",
        timezone: "Europe/London",
        utc_offset: "+00:00",
        currency: "GBP",
        trading_hours: "08:00-16:30 GMT",
        website: "https://www.londonstockexchange.com",
        established: 1801,
    },
    Exchange {
        code: "JPX",
        full_name: "Japan Exchange Group (Tokyo Stock Exchange)",
        country: "Japan",
        country_code: "JP",
        timezone: "Asia/Tokyo",
        utc_offset: "+09:00",
        currency: "JPY",
        trading_hours: "09:00-15:00 JST",
        website: "https://www.jpx.co.jp",
        established: 1878,
    },
    Exchange {
        code: "SSE",
        full_name: "Shanghai Stock Exchange",
        country: "China",
        country_code: "CN",
        timezone: "Asia/Shanghai",
        utc_offset: "+08:00",
        currency: "CNY",
        trading_hours: "09:30-15:00 CST",
        website: "http://www.sse.com.cn",
        established: 1990,
    },
    Exchange {
        code: "HKEX",
        full_name: "Hong Kong Stock Exchange",
        country: "Hong Kong",
        country_code: "HK",
        timezone: "Asia/Hong_Kong",
        utc_offset: "+08:00",
        currency: "HKD",
        trading_hours: "09:30-16:00 HKT",
        website: "https://www.hkex.com.hk",
        established: 1891,
    },
];

/// Ticker suffix → exchange code; unsuffixed tickers default to NASDAQ
const SUFFIX_EXCHANGES: &[(&str, &str)] = &[
    (".VN", "HOSE"),
    (".HNX", "HNX"),
    (".OTC", "UPCOM"),
    (".L", "LSE"),
    (".T", "JPX"),
    (".SS", "SSE"),
    (".HK", "HKEX"),
];

pub fn find_exchange(code: &str) -> Option<&'static Exchange> {
    let code = code.trim().to_uppercase();
    EXCHANGES.iter().find(|e| e.code == code)
}

pub fn exchange_for_ticker(ticker: &str) -> &'static str {
    let ticker = ticker.trim().to_uppercase();
    SUFFIX_EXCHANGES
        .iter()
        .find(|(suffix, _)| ticker.ends_with(suffix))
        .map(|(_, code)| *code)
        .unwrap_or("NASDAQ")
}

fn exchange_codes() -> Vec<&'static str> {
    EXCHANGES.iter().map(|e| e.code).collect()
}

pub struct ExchangeInfoTool {
    definition: ToolDefinition,
}

impl ExchangeInfoTool {
    pub fn new() -> Self {
        Self {
            definition: ToolDefinition::new(
                NAME,
                "Stock exchange details: country, timezone, currency and trading hours",
            )
            .with_parameter(ToolParameter::new(
                "exchange",
                "Exchange code such as HOSE, HNX, UPCOM, NYSE or NASDAQ",
                false,
            ))
            .with_parameter(ToolParameter::new(
                "ticker",
                "Ticker used to detect the exchange when no code is given",
                false,
            )),
        }
    }
}

impl Default for ExchangeInfoTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for ExchangeInfoTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn invoke(&self, call: &ToolCall) -> Result<Value, ToolError> {
        let code = match (call.get_string("exchange"), call.get_string("ticker")) {
            (Some(code), _) => code.to_uppercase(),
            (None, Some(ticker)) => exchange_for_ticker(ticker).to_string(),
            (None, None) => {
                return Ok(json!({
                    "exchanges": exchange_codes(),
                    "total": EXCHANGES.len(),
                    "timestamp": Utc::now().to_rfc3339(),
                }));
            }
        };

        let exchange = find_exchange(&code).ok_or_else(|| {
            ToolError::execution_failed(format!("Exchange '{}' not found", code))
                .with_details(format!("available: {}", exchange_codes().join(", ")))
        })?;

        Ok(json!({
            "exchange_code": exchange.code,
            "info": exchange,
            "timestamp": Utc::now().to_rfc3339(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_by_code() {
        let result = ExchangeInfoTool::new()
            .invoke(&ToolCall::new(NAME).with_arg("exchange", "hose"))
            .await
            .unwrap();
        assert_eq!(result["exchange_code"], "HOSE");
        assert_eq!(result["info"]["timezone"], "Asia/Ho_Chi_Minh");
        assert_eq!(result["info"]["currency"], "VND");
        assert!(result["info"].get("code").is_none());
    }

    #[tokio::test]
    async fn test_detect_from_ticker() {
        let tool = ExchangeInfoTool::new();
        let result = tool
            .invoke(&ToolCall::new(NAME).with_arg("ticker", "0700.HK"))
            .await
            .unwrap();
        assert_eq!(result["exchange_code"], "HKEX");

        let result = tool
            .invoke(&ToolCall::new(NAME).with_arg("ticker", "AAPL"))
            .await
            .unwrap();
        assert_eq!(result["exchange_code"], "NASDAQ");
    }

    #[tokio::test]
    async fn test_no_arguments_lists_all() {
        let result = ExchangeInfoTool::new().invoke(&ToolCall::new(NAME)).await.unwrap();
        assert_eq!(result["total"], 9);
        assert_eq!(result["exchanges"][0], "HOSE");
    }

    #[tokio::test]
    async fn test_unknown_exchange() {
        let err = ExchangeInfoTool::new()
            .invoke(&ToolCall::new(NAME).with_arg("exchange", "XETRA"))
            .await
            .unwrap_err();
        assert_eq!(err.code, "EXECUTION_FAILED");
        assert!(err.details.unwrap().contains("HOSE"));
    }
}
