//! Company name → ticker resolution
//!
//! Lookup order: a static table of well-known listings, then ticker-looking
//! tokens in the input itself. A miss is a successful call with a null
//! ticker and an `error` note, so the oracle can still explain it.

use std::sync::LazyLock;

use async_trait::async_trait;
use chrono::Utc;
use orchestrator_domain::{Tool, ToolCall, ToolDefinition, ToolError, ToolParameter};
use regex::Regex;
use serde_json::{Value, json};

pub const NAME: &str = "get_stock_symbol";

/// (lower-case alias, ticker, country code)
const KNOWN_LISTINGS: &[(&str, &str, &str)] = &[
    ("fpt", "FPT", "VN"),
    ("fpt corporation", "FPT", "VN"),
    ("vietcombank", "VCB", "VN"),
    ("ngân hàng ngoại thương", "VCB", "VN"),
    ("techcombank", "TCB", "VN"),
    ("bidv", "BID", "VN"),
    ("vietinbank", "CTG", "VN"),
    ("vpbank", "VPB", "VN"),
    ("vinamilk", "VNM", "VN"),
    ("hòa phát", "HPG", "VN"),
    ("hoa phat", "HPG", "VN"),
    ("vingroup", "VIC", "VN"),
    ("vinhomes", "VHM", "VN"),
    ("masan", "MSN", "VN"),
    ("mobile world", "MWG", "VN"),
    ("thế giới di động", "MWG", "VN"),
    ("sabeco", "SAB", "VN"),
    ("petrolimex", "PLX", "VN"),
    ("vietjet", "VJC", "VN"),
    ("apple", "AAPL", "US"),
    ("microsoft", "MSFT", "US"),
    ("alphabet", "GOOGL", "US"),
    ("google", "GOOGL", "US"),
    ("amazon", "AMZN", "US"),
    ("meta", "META", "US"),
    ("facebook", "META", "US"),
    ("nvidia", "NVDA", "US"),
    ("tesla", "TSLA", "US"),
    ("netflix", "NFLX", "US"),
    ("intel", "INTC", "US"),
    ("amd", "AMD", "US"),
];

/// Upper-case words that are never tickers on their own
const COMMON_WORDS: &[&str] = &[
    "A", "AN", "AND", "ARE", "FOR", "FROM", "IS", "OF", "THE", "WHAT", "WITH", "CODE", "PRICE",
    "STOCK", "SYMBOL", "TICKER",
];

// Only the label is case-insensitive; the ticker itself must be written in capitals
static TICKER_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i:ticker|symbol)\s*[:=]?\s*([A-Z][A-Z0-9.\-]{0,7})\b").expect("static regex")
});
static VN_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b([A-Z0-9]{1,6}\.VN)\b").expect("static regex"));
static UPPER_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z]{2,5})\b").expect("static regex"));

/// Ticker-looking tokens in `text`, labelled ones first, deduplicated
pub fn ticker_candidates(text: &str) -> Vec<String> {
    let labelled = TICKER_LABEL_RE.captures_iter(text).map(|c| c[1].to_string());
    let vn = VN_TOKEN_RE.captures_iter(text).map(|c| c[1].to_uppercase());
    let upper = UPPER_TOKEN_RE.captures_iter(text).map(|c| c[1].to_string());

    let mut out: Vec<String> = Vec::new();
    for candidate in labelled.chain(vn).chain(upper) {
        if !COMMON_WORDS.contains(&candidate.as_str()) && !out.contains(&candidate) {
            out.push(candidate);
        }
    }
    out
}

fn lookup_listing(company: &str, country: Option<&str>) -> Option<&'static str> {
    let lowered = company.to_lowercase();
    let country = country.map(normalize_country);
    KNOWN_LISTINGS
        .iter()
        .filter(|(_, _, code)| country.is_none_or(|c| c == *code))
        .find(|(alias, _, _)| lowered == *alias)
        .or_else(|| {
            KNOWN_LISTINGS
                .iter()
                .find(|(alias, _, _)| alias.len() > 3 && lowered.contains(alias))
        })
        .map(|(_, ticker, _)| *ticker)
}

fn normalize_country(country: &str) -> &'static str {
    match country.trim().to_lowercase().as_str() {
        "vn" | "vietnam" | "viet nam" | "việt nam" => "VN",
        "us" | "usa" | "united states" => "US",
        _ => "",
    }
}

fn build_result(
    company: &str,
    ticker: Option<&str>,
    source: &str,
    confidence: f64,
    error: Option<&str>,
) -> Value {
    json!({
        "company_name": company,
        "ticker": ticker,
        "source": source,
        "confidence": confidence,
        "timestamp": Utc::now().to_rfc3339(),
        "error": error,
    })
}

pub struct StockSymbolTool {
    definition: ToolDefinition,
}

impl StockSymbolTool {
    pub fn new() -> Self {
        Self {
            definition: ToolDefinition::new(
                NAME,
                "Find the stock ticker symbol for a company name (Vietnamese and US listings)",
            )
            .with_parameter(ToolParameter::new(
                "company_name",
                "Company name, e.g. 'FPT Corporation' or 'Apple'",
                true,
            ))
            .with_parameter(ToolParameter::new(
                "country",
                "Country hint, e.g. 'VN' or 'US'",
                false,
            )),
        }
    }
}

impl Default for StockSymbolTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for StockSymbolTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn invoke(&self, call: &ToolCall) -> Result<Value, ToolError> {
        let company = call
            .require_string("company_name")
            .map_err(ToolError::invalid_argument)?;
        let country = call.get_string("country");

        if let Some(ticker) = lookup_listing(company, country) {
            return Ok(build_result(company, Some(ticker), "static_table", 0.95, None));
        }

        match ticker_candidates(company).first() {
            Some(candidate) => Ok(build_result(
                company,
                Some(candidate),
                "input_heuristic",
                0.4,
                Some("not validated"),
            )),
            None => Ok(build_result(company, None, "none", 0.0, Some("ticker not found"))),
        }
    }
}
