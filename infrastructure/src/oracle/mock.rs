//! Deterministic offline oracle
//!
//! Recognizes the four request shapes the orchestrator sends and answers
//! each without any network access:
//!
//! | Request | Reply |
//! |---------|-------|
//! | decomposition | two-node ticker → price plan for price questions, one node otherwise |
//! | tool result follow-up | short summary of the returned fields |
//! | tools offered | function call to the first offered tool |
//! | synthesis | report listing each sub-question answer |
//!
//! Anything else gets a plain text echo of the question.

use std::sync::LazyLock;

use async_trait::async_trait;
use orchestrator_application::ports::oracle::{Oracle, OracleError};
use orchestrator_domain::prompt::{DECOMPOSITION_MARKER, SYNTHESIS_MARKER, TOOL_RESULT_PREFIX};
use orchestrator_domain::{FunctionCall, Message, OracleResponse, Role, ToolDefinition};
use regex::Regex;
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::tools::stock_symbol::ticker_candidates;

const PRICE_TERMS: &[&str] = &["price", "giá", "stock", "cổ phiếu", "trading at"];
const EXCHANGE_CODES: &[&str] = &["HOSE", "HNX", "UPCOM", "NYSE", "NASDAQ", "LSE", "JPX", "SSE", "HKEX"];
const CURRENCY_CODES: &[&str] = &["USD", "VND", "EUR", "GBP", "JPY", "CNY", "SGD", "THB", "KRW"];
const COUNTRIES: &[(&str, &str)] = &[
    ("vietnam", "VN"),
    ("việt nam", "VN"),
    ("united states", "US"),
    ("us ", "US"),
    ("china", "CN"),
    ("japan", "JP"),
    ("europe", "EU"),
];
const INDICATOR_WORDS: &[(&str, &str)] = &[
    ("inflation", "inflation_cpi"),
    ("lạm phát", "inflation_cpi"),
    ("cpi", "inflation_cpi"),
    ("gdp", "gdp_growth"),
    ("unemployment", "unemployment"),
    ("thất nghiệp", "unemployment"),
    ("interest", "interest_rate"),
    ("lãi suất", "interest_rate"),
];
/// Upper-case tokens that are never tickers
const NOT_TICKERS: &[&str] = &["USD", "VND", "EUR", "GDP", "CPI", "UTC", "ID", "JSON"];

static SUBJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bof\s+(.+?)\s*\??$").expect("static regex"));

#[derive(Debug, Default, Clone)]
pub struct MockOracle;

impl MockOracle {
    pub fn new() -> Self {
        Self
    }

    fn decompose(&self, query: &str) -> OracleResponse {
        let lowered = query.to_lowercase();
        let plan = if PRICE_TERMS.iter().any(|t| lowered.contains(t)) {
            let subject = subject_of(query);
            json!({
                "subquestions": [
                    {"id": 1, "question": format!("What is the stock ticker symbol of {}?", subject), "depends_on": []},
                    {"id": 2, "question": "What is the current stock price of {{TICKER_FROM_Q1}}?", "depends_on": [1]}
                ]
            })
        } else {
            json!({
                "subquestions": [
                    {"id": 1, "question": query, "depends_on": []}
                ]
            })
        };
        OracleResponse::text(plan.to_string())
    }

    fn call_tool(&self, question: &str, tool: &ToolDefinition) -> OracleResponse {
        let mut arguments = Map::new();
        for name in tool.parameter_names() {
            if let Some(value) = synthesize_argument(name, question) {
                arguments.insert(name.to_string(), value);
            }
        }
        OracleResponse::function_call(FunctionCall::new(&tool.name, Value::Object(arguments)))
    }

    fn summarize_tool_result(&self, message: &str) -> OracleResponse {
        let Some((head, payload)) = message.split_once(" returned: ") else {
            return OracleResponse::text(message);
        };
        let tool = head.trim_start_matches(TOOL_RESULT_PREFIX);
        let fields = match serde_json::from_str::<Value>(payload) {
            Ok(Value::Object(map)) => map
                .iter()
                .filter(|(key, value)| key.as_str() != "timestamp" && !value.is_null())
                .map(|(key, value)| format!("{}={}", key, scalar_text(value)))
                .collect::<Vec<_>>()
                .join(", "),
            _ => payload.to_string(),
        };
        OracleResponse::text(format!("{} reports {}", tool, fields))
    }

    fn synthesize(&self, prompt: &str) -> OracleResponse {
        let query = section_after(prompt, "Original question:\n").unwrap_or_default();
        let records = prompt
            .find("\n[")
            .and_then(|start| {
                serde_json::Deserializer::from_str(&prompt[start..])
                    .into_iter::<Value>()
                    .next()
                    .and_then(Result::ok)
            })
            .and_then(|v| v.as_array().cloned())
            .unwrap_or_default();

        let mut report = format!("Answer to: {}\n", query);
        for record in &records {
            report.push_str(&format!(
                "\n- {} [{}]: {}",
                scalar_text(&record["question"]),
                scalar_text(&record["status"]),
                scalar_text(&record["text"]),
            ));
        }
        if records.is_empty() {
            report.push_str("\nNo sub-question results were available.");
        }
        OracleResponse::text(report)
    }
}

#[async_trait]
impl Oracle for MockOracle {
    async fn generate(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
    ) -> Result<OracleResponse, OracleError> {
        let joined: String = messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let last = messages.last().map(|m| m.content.as_str()).unwrap_or("");

        let response = if joined.contains(DECOMPOSITION_MARKER) {
            let query = last_user(messages)
                .and_then(|content| content.rsplit_once("User query:\n").map(|(_, q)| q))
                .unwrap_or(last);
            self.decompose(query.trim())
        } else if joined.contains(SYNTHESIS_MARKER) {
            self.synthesize(&joined)
        } else if messages.last().is_some_and(|m| m.role == Role::Assistant)
            && last.starts_with(TOOL_RESULT_PREFIX)
        {
            self.summarize_tool_result(last)
        } else {
            let question = question_line(&joined).unwrap_or(last);
            match tools.and_then(|t| t.first()) {
                Some(tool) => self.call_tool(question, tool),
                None => OracleResponse::text(format!("Offline answer for: {}", question)),
            }
        };

        debug!(
            text = response.text.as_deref().unwrap_or(""),
            function = response.function_call.as_ref().map(|c| c.name.as_str()).unwrap_or(""),
            "Mock oracle reply"
        );
        Ok(response)
    }

    fn name(&self) -> &str {
        "mock"
    }
}

fn last_user(messages: &[Message]) -> Option<&str> {
    messages
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
}

fn question_line(text: &str) -> Option<&str> {
    text.lines()
        .find_map(|line| line.strip_prefix("Question: "))
        .map(str::trim)
}

fn section_after<'a>(text: &'a str, heading: &str) -> Option<&'a str> {
    let (_, rest) = text.split_once(heading)?;
    Some(rest.split("\n\n").next().unwrap_or(rest).trim())
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// The company or ticker a question is about
fn subject_of(text: &str) -> String {
    if let Some(ticker) = tickers(text).into_iter().next() {
        return ticker;
    }
    SUBJECT_RE
        .captures(text)
        .map(|c| c[1].to_string())
        .unwrap_or_else(|| text.trim_end_matches('?').trim().to_string())
}

fn tickers(text: &str) -> Vec<String> {
    ticker_candidates(text)
        .into_iter()
        .filter(|t| !NOT_TICKERS.contains(&t.as_str()) && !EXCHANGE_CODES.contains(&t.as_str()))
        .collect()
}

fn synthesize_argument(param: &str, question: &str) -> Option<Value> {
    let upper = question.to_uppercase();
    let lowered = question.to_lowercase();
    let subject = SUBJECT_RE.captures(question).map(|c| c[1].to_string());

    match param {
        "company_name" => Some(json!(subject.unwrap_or_else(|| subject_of(question)))),
        "ticker" => subject
            .as_deref()
            .and_then(|s| tickers(s).into_iter().next())
            .or_else(|| tickers(question).into_iter().next())
            .map(Value::from),
        "exchange" => EXCHANGE_CODES
            .iter()
            .find(|code| upper.split(|c: char| !c.is_alphanumeric()).any(|w| w == **code))
            .map(|code| json!(code)),
        "from_currency" | "to_currency" => {
            let mut found: Vec<(usize, &str)> = CURRENCY_CODES
                .iter()
                .filter_map(|code| upper.find(code).map(|pos| (pos, *code)))
                .collect();
            found.sort();
            let index = usize::from(param == "to_currency");
            found.get(index).map(|(_, code)| json!(code))
        }
        "country" => COUNTRIES
            .iter()
            .find(|(word, _)| lowered.contains(word))
            .map(|(_, code)| json!(code)),
        "indicator" => INDICATOR_WORDS
            .iter()
            .find(|(word, _)| lowered.contains(word))
            .map(|(_, indicator)| json!(indicator)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orchestrator_domain::{AnswerRecord, PromptTemplate, ToolParameter, parse_subquestions};

    fn price_tool() -> ToolDefinition {
        ToolDefinition::new("get_stock_price", "Price")
            .with_parameter(ToolParameter::new("ticker", "Ticker", true))
    }

    #[tokio::test]
    async fn test_price_query_decomposes_into_two_nodes() {
        let messages = vec![
            Message::system(PromptTemplate::decomposition_system()),
            Message::user(PromptTemplate::decomposition_query("What is FPT's stock price?", "")),
        ];
        let response = MockOracle::new().generate(&messages, None).await.unwrap();
        let nodes = parse_subquestions(response.text_or_empty()).unwrap();

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].text, "What is the stock ticker symbol of FPT?");
        assert!(nodes[1].text.contains("{{TICKER_FROM_Q1}}"));
        assert_eq!(nodes[1].depends_on, vec![1]);
    }

    #[tokio::test]
    async fn test_other_query_is_single_node() {
        let messages = vec![
            Message::system(PromptTemplate::decomposition_system()),
            Message::user(PromptTemplate::decomposition_query("Inflation in Vietnam?", "")),
        ];
        let response = MockOracle::new().generate(&messages, None).await.unwrap();
        let nodes = parse_subquestions(response.text_or_empty()).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].text, "Inflation in Vietnam?");
    }

    #[tokio::test]
    async fn test_tools_offered_calls_first_tool() {
        let messages = vec![
            Message::system(PromptTemplate::subquestion_system()),
            Message::user("Sub-question ID: 2\nQuestion: What is the current stock price of VCB?\n"),
        ];
        let tools = [price_tool()];
        let response = MockOracle::new()
            .generate(&messages, Some(&tools))
            .await
            .unwrap();
        let call = response.function_call.unwrap();
        assert_eq!(call.name, "get_stock_price");
        assert_eq!(call.arguments["ticker"], "VCB");
    }

    #[test]
    fn test_argument_synthesis() {
        assert_eq!(
            synthesize_argument("company_name", "What is the stock ticker symbol of Vinamilk?"),
            Some(json!("Vinamilk"))
        );
        assert_eq!(
            synthesize_argument("from_currency", "Convert 100 USD to VND"),
            Some(json!("USD"))
        );
        assert_eq!(
            synthesize_argument("to_currency", "Convert 100 USD to VND"),
            Some(json!("VND"))
        );
        assert_eq!(
            synthesize_argument("exchange", "Trading hours of HOSE?"),
            Some(json!("HOSE"))
        );
        assert_eq!(
            synthesize_argument("indicator", "What is inflation in Japan?"),
            Some(json!("inflation_cpi"))
        );
        assert_eq!(synthesize_argument("country", "What is inflation in Japan?"), Some(json!("JP")));
        assert_eq!(synthesize_argument("amount", "anything"), None);
    }

    #[tokio::test]
    async fn test_tool_result_follow_up() {
        let messages = vec![
            Message::user("Question: price?"),
            Message::assistant(PromptTemplate::tool_result(
                "get_stock_price",
                &json!({"ticker": "FPT", "price": 120.5, "timestamp": "t"}),
            )),
        ];
        let response = MockOracle::new().generate(&messages, None).await.unwrap();
        assert_eq!(response.text_or_empty(), "get_stock_price reports ticker=FPT, price=120.5");
    }

    #[tokio::test]
    async fn test_synthesis_lists_records() {
        let records = vec![
            AnswerRecord::answered(1, "Ticker of FPT?", "FPT", vec![], Map::new()),
            AnswerRecord::skipped(2, "Price of {{TICKER_FROM_Q1}}?", &["TICKER_FROM_Q1".to_string()]),
        ];
        let messages = vec![
            Message::system(PromptTemplate::synthesis_system()),
            Message::user(PromptTemplate::synthesis_prompt("FPT price?", &records)),
        ];
        let response = MockOracle::new().generate(&messages, None).await.unwrap();
        let text = response.text_or_empty();

        assert!(text.starts_with("Answer to: FPT price?"));
        assert!(text.contains("- Ticker of FPT? [ok]: FPT"));
        assert!(text.contains("[skipped]: SKIP: missing placeholders"));
    }

    #[tokio::test]
    async fn test_plain_question_without_tools() {
        let messages = vec![Message::user("Question: Who founded FPT?")];
        let response = MockOracle::new().generate(&messages, None).await.unwrap();
        assert_eq!(response.text_or_empty(), "Offline answer for: Who founded FPT?");
    }
}
