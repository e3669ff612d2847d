//! Sector and industry classification for well-known tickers

use async_trait::async_trait;
use chrono::Utc;
use orchestrator_domain::{Tool, ToolCall, ToolDefinition, ToolError, ToolParameter};
use serde::Serialize;
use serde_json::{Value, json};

pub const NAME: &str = "get_sector_mapping";

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Classification {
    #[serde(skip)]
    pub ticker: &'static str,
    pub company_name: &'static str,
    pub sector: &'static str,
    pub industry: &'static str,
    pub country: &'static str,
    #[serde(skip)]
    pub peers: &'static [&'static str],
}

const fn entry(
    ticker: &'static str,
    company_name: &'static str,
    sector: &'static str,
    industry: &'static str,
    country: &'static str,
    peers: &'static [&'static str],
) -> Classification {
    Classification {
        ticker,
        company_name,
        sector,
        industry,
        country,
        peers,
    }
}

pub const CLASSIFICATIONS: &[Classification] = &[
    entry("FPT", "FPT Corporation", "Technology", "Information Technology Services", "Vietnam", &["CMG", "SAM", "VGI"]),
    entry("VCB", "Joint Stock Commercial Bank for Foreign Trade of Vietnam", "Financial Services", "Banks - Regional", "Vietnam", &["TCB", "BID", "CTG", "VPB"]),
    entry("TCB", "Vietnam Technological and Commercial Joint Stock Bank", "Financial Services", "Banks - Regional", "Vietnam", &["VCB", "MBB", "ACB", "VPB"]),
    entry("BID", "Joint Stock Commercial Bank for Investment and Development of Vietnam", "Financial Services", "Banks - Regional", "Vietnam", &["VCB", "CTG", "AGR"]),
    entry("CTG", "Vietnam Joint Stock Commercial Bank for Industry and Trade", "Financial Services", "Banks - Regional", "Vietnam", &["VCB", "BID", "TCB"]),
    entry("VNM", "Vietnam Dairy Products JSC", "Consumer Defensive", "Packaged Foods", "Vietnam", &["MSN", "VHC", "SAB"]),
    entry("MSN", "Masan Group Corporation", "Consumer Defensive", "Packaged Foods", "Vietnam", &["VNM", "SAB", "MWG"]),
    entry("HPG", "Hoa Phat Group JSC", "Basic Materials", "Steel", "Vietnam", &["HSG", "NKG", "TLH"]),
    entry("VIC", "Vingroup JSC", "Real Estate", "Real Estate - Diversified", "Vietnam", &["VHM", "NVL", "KDH"]),
    entry("MWG", "Mobile World Investment Corporation", "Consumer Cyclical", "Specialty Retail", "Vietnam", &["FRT", "DGW", "PNJ"]),
    entry("AAPL", "Apple Inc.", "Technology", "Consumer Electronics", "United States", &["MSFT", "GOOGL", "META", "NVDA"]),
    entry("MSFT", "Microsoft Corporation", "Technology", "Software - Infrastructure", "United States", &["AAPL", "GOOGL", "AMZN", "META"]),
    entry("GOOGL", "Alphabet Inc.", "Communication Services", "Internet Content & Information", "United States", &["AAPL", "MSFT", "META", "AMZN"]),
    entry("META", "Meta Platforms, Inc.", "Communication Services", "Internet Content & Information", "United States", &["GOOGL", "SNAP", "PINS"]),
    entry("AMZN", "Amazon.com, Inc.", "Consumer Cyclical", "Internet Retail", "United States", &["WMT", "BABA", "EBAY"]),
    entry("NVDA", "NVIDIA Corporation", "Technology", "Semiconductors", "United States", &["AMD", "INTC", "QCOM", "TSM"]),
    entry("TSLA", "Tesla, Inc.", "Consumer Cyclical", "Auto Manufacturers", "United States", &["GM", "F", "RIVN"]),
];

/// Classification for `ticker`, ignoring exchange suffixes such as `.VN`
pub fn classify(ticker: &str) -> Option<&'static Classification> {
    let upper = ticker.trim().to_uppercase();
    let base = upper.split('.').next().unwrap_or(&upper);
    CLASSIFICATIONS.iter().find(|c| c.ticker == base)
}

pub struct SectorMappingTool {
    definition: ToolDefinition,
}

impl SectorMappingTool {
    pub fn new() -> Self {
        Self {
            definition: ToolDefinition::new(
                NAME,
                "Sector, industry and peer companies for a stock ticker",
            )
            .with_parameter(ToolParameter::new(
                "ticker",
                "Ticker symbol, e.g. 'FPT' or 'AAPL'",
                true,
            )),
        }
    }
}

impl Default for SectorMappingTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for SectorMappingTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn invoke(&self, call: &ToolCall) -> Result<Value, ToolError> {
        let ticker = call
            .require_string("ticker")
            .map_err(ToolError::invalid_argument)?
            .to_uppercase();
        let classification = classify(&ticker).ok_or_else(|| {
            ToolError::execution_failed(format!("No sector classification for {}", ticker))
        })?;

        Ok(json!({
            "ticker": ticker,
            "classification": classification,
            "peers": classification.peers,
            "timestamp": Utc::now().to_rfc3339(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_classification_with_suffix() {
        let result = SectorMappingTool::new()
            .invoke(&ToolCall::new(NAME).with_arg("ticker", "fpt.vn"))
            .await
            .unwrap();
        assert_eq!(result["ticker"], "FPT.VN");
        assert_eq!(result["classification"]["sector"], "Technology");
        assert_eq!(result["classification"]["country"], "Vietnam");
        assert_eq!(result["peers"], json!(["CMG", "SAM", "VGI"]));
    }

    #[tokio::test]
    async fn test_unknown_ticker() {
        let err = SectorMappingTool::new()
            .invoke(&ToolCall::new(NAME).with_arg("ticker", "ZZZZ"))
            .await
            .unwrap_err();
        assert_eq!(err.code, "EXECUTION_FAILED");
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify(" aapl ").unwrap().industry, "Consumer Electronics");
        assert!(classify("").is_none());
    }
}
