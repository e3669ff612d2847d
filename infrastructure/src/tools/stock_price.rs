//! Latest market price from the backend API

use async_trait::async_trait;
use chrono::Utc;
use orchestrator_domain::{Tool, ToolCall, ToolDefinition, ToolError, ToolParameter};
use serde_json::{Value, json};

use super::backend::BackendClient;

pub const NAME: &str = "get_stock_price";

/// VND for Vietnamese listing suffixes, USD otherwise
pub fn detect_currency(symbol: &str) -> &'static str {
    if [".VN", ".HM", ".HN"].iter().any(|s| symbol.ends_with(s)) {
        "VND"
    } else {
        "USD"
    }
}

pub struct StockPriceTool {
    definition: ToolDefinition,
    backend: BackendClient,
}

impl StockPriceTool {
    pub fn new(backend: BackendClient) -> Self {
        Self {
            definition: ToolDefinition::new(
                NAME,
                "Get the latest market price of a stock by ticker symbol",
            )
            .with_parameter(ToolParameter::new(
                "ticker",
                "Ticker symbol, e.g. 'FPT', 'VCB.VN' or 'AAPL'",
                true,
            )),
            backend,
        }
    }
}

#[async_trait]
impl Tool for StockPriceTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn invoke(&self, call: &ToolCall) -> Result<Value, ToolError> {
        let ticker = call
            .require_string("ticker")
            .map_err(ToolError::invalid_argument)?
            .to_uppercase();

        let data = self.backend.ticker_detail(&ticker).await?;
        let price = data.get("price").cloned().unwrap_or(Value::Null);
        if price.is_null() {
            return Err(ToolError::execution_failed(format!(
                "no price data for {}",
                ticker
            )));
        }
        let currency = data
            .get("currency")
            .and_then(Value::as_str)
            .unwrap_or_else(|| detect_currency(&ticker));

        Ok(json!({
            "ticker": ticker,
            "price": price,
            "currency": currency,
            "timestamp": Utc::now().to_rfc3339(),
            "source": "backend-api",
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_detect_currency() {
        assert_eq!(detect_currency("VCB.VN"), "VND");
        assert_eq!(detect_currency("FPT.HM"), "VND");
        assert_eq!(detect_currency("AAPL"), "USD");
    }

    #[tokio::test]
    async fn test_price_from_backend() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("symbol", "VCB.VN"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"close": 92000})))
            .mount(&server)
            .await;

        let tool = StockPriceTool::new(BackendClient::new(server.uri(), Duration::from_secs(5)));
        let result = tool
            .invoke(&ToolCall::new(NAME).with_arg("ticker", " vcb.vn "))
            .await
            .unwrap();

        assert_eq!(result["ticker"], "VCB.VN");
        assert_eq!(result["price"], json!(92000));
        assert_eq!(result["currency"], "VND");
        assert_eq!(result["source"], "backend-api");
    }

    #[tokio::test]
    async fn test_backend_currency_wins() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"price": 3.1, "currency": "EUR"})),
            )
            .mount(&server)
            .await;

        let tool = StockPriceTool::new(BackendClient::new(server.uri(), Duration::from_secs(5)));
        let result = tool
            .invoke(&ToolCall::new(NAME).with_arg("ticker", "SAP"))
            .await
            .unwrap();
        assert_eq!(result["currency"], "EUR");
    }

    #[tokio::test]
    async fn test_unreachable_backend_fails() {
        // Port 9 (discard) on loopback refuses connections on test hosts
        let tool = StockPriceTool::new(BackendClient::new(
            "http://127.0.0.1:9",
            Duration::from_secs(2),
        ));
        let err = tool
            .invoke(&ToolCall::new(NAME).with_arg("ticker", "FPT"))
            .await
            .unwrap_err();
        assert_eq!(err.code, "EXECUTION_FAILED");
    }

    #[tokio::test]
    async fn test_missing_ticker() {
        let tool = StockPriceTool::new(BackendClient::new("http://127.0.0.1:9", Duration::from_secs(1)));
        let err = tool.invoke(&ToolCall::new(NAME)).await.unwrap_err();
        assert_eq!(err.code, "INVALID_ARGUMENT");
    }
}
