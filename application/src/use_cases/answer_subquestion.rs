//! Answer Sub-Question use case.
//!
//! Processes one scheduled node: resolve placeholders, select tools, let the
//! oracle pick one, run it, and turn the outcome into an [`AnswerRecord`].
//! Every failure here is captured in the record; nothing aborts the run.

use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::oracle::Oracle;
use crate::ports::progress::RunProgressNotifier;
use crate::ports::tool_executor::ToolExecutorPort;
use crate::use_cases::dispatch::ToolDispatcher;
use crate::use_cases::select_tools::ToolSelector;
use crate::use_cases::shared::generate_with_timeout;
use chrono::Utc;
use orchestrator_domain::{
    AnswerBook, AnswerRecord, FunctionCall, Message, PromptTemplate, SubQuestionNode,
    ToolDefinition, resolve_placeholders,
};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct AnswerSubQuestionUseCase {
    oracle: Arc<dyn Oracle>,
    tools: Arc<dyn ToolExecutorPort>,
    selector: ToolSelector,
    dispatcher: ToolDispatcher,
    logger: Arc<dyn ConversationLogger>,
    oracle_timeout: Duration,
}

impl AnswerSubQuestionUseCase {
    pub fn new(
        oracle: Arc<dyn Oracle>,
        tools: Arc<dyn ToolExecutorPort>,
        selector: ToolSelector,
        dispatcher: ToolDispatcher,
        logger: Arc<dyn ConversationLogger>,
        oracle_timeout: Duration,
    ) -> Self {
        Self {
            oracle,
            tools,
            selector,
            dispatcher,
            logger,
            oracle_timeout,
        }
    }

    pub async fn execute(
        &self,
        node: &SubQuestionNode,
        answers: &AnswerBook,
        user_query: &str,
        progress: &dyn RunProgressNotifier,
    ) -> AnswerRecord {
        let resolution = resolve_placeholders(&node.text, answers);
        if !resolution.is_complete() {
            info!(node = node.id, missing = ?resolution.missing, "Skipping sub-question");
            return AnswerRecord::skipped(node.id, resolution.text, &resolution.missing);
        }
        let question = resolution.text;
        debug!(node = node.id, question = %question, "Resolved sub-question");
        progress.on_node_start(node.id, &question).await;

        let candidates = self.selector.select(&question).await;
        let offered: Vec<ToolDefinition> = candidates
            .iter()
            .filter_map(|name| self.tools.get_tool(name).cloned())
            .collect();

        let dependencies = answers.collect(&node.depends_on);
        let mut messages = vec![
            Message::system(PromptTemplate::subquestion_system()),
            Message::user(PromptTemplate::subquestion_prompt(
                node.id,
                &question,
                &dependencies,
                user_query,
                Utc::now(),
            )),
        ];

        let tools = (!offered.is_empty()).then_some(offered.as_slice());
        let response =
            match generate_with_timeout(self.oracle.as_ref(), &messages, tools, self.oracle_timeout).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(node = node.id, error = %e, "Oracle failed for sub-question");
                    return AnswerRecord::failed(node.id, question, format!("ERROR: oracle unavailable: {}", e));
                }
            };

        let directive = match (tools, response.directive()) {
            (Some(_), Some(directive)) => directive,
            _ => {
                debug!(node = node.id, "Answered without tool");
                return AnswerRecord::answered(node.id, question, response.text_or_empty(), Vec::new(), Map::new());
            }
        };

        let Some(tool) = self.dispatcher.resolve_name(&directive.name, &candidates) else {
            return AnswerRecord::answered(node.id, question, response.text_or_empty(), Vec::new(), Map::new());
        };
        let tool = tool.to_string();

        self.run_tool(node, question, &tool, &directive, &mut messages, progress).await
    }

    async fn run_tool(
        &self,
        node: &SubQuestionNode,
        question: String,
        tool: &str,
        directive: &FunctionCall,
        messages: &mut Vec<Message>,
        progress: &dyn RunProgressNotifier,
    ) -> AnswerRecord {
        info!(node = node.id, tool, "Calling tool");
        progress.on_tool_call(node.id, tool, &question).await;
        self.logger.log(ConversationEvent::new(
            "tool_call",
            json!({ "node": node.id, "tool": tool, "arguments": directive.arguments }),
        ));

        let result = self.dispatcher.dispatch(tool, directive).await;
        progress.on_tool_complete(node.id, tool, result.is_ok()).await;

        let data = match result {
            Ok(data) => data,
            Err(e) => {
                self.logger.log(ConversationEvent::new(
                    "tool_result",
                    json!({ "node": node.id, "tool": tool, "success": false, "error": e.message }),
                ));
                return AnswerRecord::tool_failed(node.id, question, tool, &e.message);
            }
        };
        self.logger.log(ConversationEvent::new(
            "tool_result",
            json!({ "node": node.id, "tool": tool, "success": true, "data": data }),
        ));

        let data_value = Value::Object(data.clone());
        messages.push(Message::assistant(PromptTemplate::tool_result(tool, &data_value)));
        let text = match generate_with_timeout(self.oracle.as_ref(), messages, None, self.oracle_timeout).await {
            Ok(reply) if !reply.is_blank() => reply.text_or_empty().to_string(),
            Ok(_) => data_value.to_string(),
            Err(e) => {
                warn!(node = node.id, error = %e, "Follow-up failed, using raw tool data");
                data_value.to_string()
            }
        };
        AnswerRecord::answered(node.id, question, text, vec![tool.to_string()], data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::conversation_logger::NoConversationLogger;
    use crate::ports::oracle::OracleError;
    use crate::ports::progress::NoProgress;
    use crate::use_cases::shared::testing::{RecordingTools, ScriptedOracle, StaticTool};
    use orchestrator_domain::{AnswerStatus, OracleResponse, Tool, ToolError, ToolParameter};

    fn symbol_tool() -> Box<dyn Tool> {
        StaticTool::ok(
            ToolDefinition::new("get_stock_symbol", "Find the ticker for a company")
                .with_parameter(ToolParameter::new("company_name", "Company", true)),
            json!({"company_name": "FPT Corporation", "ticker": "FPT"}),
        )
    }

    fn price_tool_failing() -> Box<dyn Tool> {
        StaticTool::failing(
            ToolDefinition::new("get_stock_price", "Latest price")
                .with_parameter(ToolParameter::new("ticker", "Ticker", true)),
            ToolError::execution_failed("backend unreachable"),
        )
    }

    fn use_case(oracle: Arc<ScriptedOracle>, tools: Arc<RecordingTools>) -> AnswerSubQuestionUseCase {
        let tools: Arc<dyn ToolExecutorPort> = tools;
        AnswerSubQuestionUseCase::new(
            oracle,
            tools.clone(),
            ToolSelector::new(tools.clone(), None, 4),
            ToolDispatcher::new(tools, Duration::from_secs(1)),
            Arc::new(NoConversationLogger),
            Duration::from_secs(1),
        )
    }

    #[tokio::test]
    async fn test_missing_placeholder_skips_without_oracle() {
        let oracle = Arc::new(ScriptedOracle::new(vec![]));
        let uc = use_case(oracle.clone(), Arc::new(RecordingTools::new(vec![symbol_tool()])));
        let node = SubQuestionNode::new(2, "Price of {{TICKER_FROM_Q1}}").with_depends_on(vec![1]);

        let record = uc.execute(&node, &AnswerBook::new(), "q", &NoProgress).await;
        assert_eq!(record.status(), AnswerStatus::Skipped);
        assert_eq!(record.text(), "SKIP: missing placeholders [TICKER_FROM_Q1]");
        assert_eq!(oracle.request_count(), 0);
    }

    #[tokio::test]
    async fn test_tool_directive_runs_tool_and_follow_up() {
        let oracle = Arc::new(ScriptedOracle::new(vec![
            Ok(OracleResponse::function_call(FunctionCall::new(
                "get_stock_symbol",
                json!("{\"company\": \"FPT\"}"),
            ))),
            Ok(OracleResponse::text("The ticker for FPT Corporation is FPT.")),
        ]));
        let tools = Arc::new(RecordingTools::new(vec![symbol_tool()]));
        let uc = use_case(oracle.clone(), tools.clone());
        let node = SubQuestionNode::new(1, "What is the ticker symbol for FPT?");

        let record = uc.execute(&node, &AnswerBook::new(), "q", &NoProgress).await;
        assert!(record.is_ok());
        assert_eq!(record.text(), "The ticker for FPT Corporation is FPT.");
        assert_eq!(record.used_tools(), ["get_stock_symbol".to_string()]);
        assert_eq!(record.extracted_data()["ticker"], "FPT");

        assert_eq!(oracle.offered_tools(0), vec!["get_stock_symbol"]);
        assert!(oracle.offered_tools(1).is_empty());
        assert_eq!(tools.recorded()[0].get_string("company_name"), Some("FPT"));

        let follow_up = &oracle.requests.lock().unwrap()[1].0;
        let last = follow_up.last().unwrap();
        assert!(last.content.starts_with("Tool get_stock_symbol returned: "));
    }

    #[tokio::test]
    async fn test_blank_follow_up_uses_tool_data() {
        let oracle = Arc::new(ScriptedOracle::new(vec![Ok(OracleResponse::text(
            r#"{"name": "get_stock_symbol", "arguments": {"company_name": "FPT"}}"#,
        ))]));
        let uc = use_case(oracle, Arc::new(RecordingTools::new(vec![symbol_tool()])));
        let node = SubQuestionNode::new(1, "ticker for FPT");

        let record = uc.execute(&node, &AnswerBook::new(), "q", &NoProgress).await;
        assert!(record.is_ok());
        assert!(record.text().contains(r#""ticker":"FPT""#));
    }

    #[tokio::test]
    async fn test_tool_failure_is_errored_record() {
        let oracle = Arc::new(ScriptedOracle::new(vec![Ok(OracleResponse::function_call(
            FunctionCall::new("get_stock_price", json!({"ticker": "FPT"})),
        ))]));
        let uc = use_case(oracle, Arc::new(RecordingTools::new(vec![price_tool_failing()])));
        let node = SubQuestionNode::new(2, "What is the price of FPT?");

        let record = uc.execute(&node, &AnswerBook::new(), "q", &NoProgress).await;
        assert_eq!(record.status(), AnswerStatus::Errored);
        assert_eq!(record.text(), "ERROR executing tool get_stock_price: backend unreachable");
        assert_eq!(record.used_tools(), ["get_stock_price".to_string()]);
        assert!(record.extracted_data().is_empty());
    }

    #[tokio::test]
    async fn test_no_candidates_plain_answer() {
        let oracle = Arc::new(ScriptedOracle::new(vec![Ok(OracleResponse::text("Hello!"))]));
        let uc = use_case(oracle.clone(), Arc::new(RecordingTools::new(vec![symbol_tool()])));
        let node = SubQuestionNode::new(1, "Say hello");

        let record = uc.execute(&node, &AnswerBook::new(), "q", &NoProgress).await;
        assert!(record.is_ok());
        assert_eq!(record.text(), "Hello!");
        assert!(record.used_tools().is_empty());
        assert!(oracle.offered_tools(0).is_empty());
    }

    #[tokio::test]
    async fn test_unknown_tool_name_uses_first_candidate() {
        let oracle = Arc::new(ScriptedOracle::new(vec![
            Ok(OracleResponse::function_call(FunctionCall::new("lookup_ticker", json!({"company_name": "FPT"})))),
            Ok(OracleResponse::text("FPT")),
        ]));
        let uc = use_case(oracle, Arc::new(RecordingTools::new(vec![symbol_tool()])));
        let node = SubQuestionNode::new(1, "ticker for FPT");

        let record = uc.execute(&node, &AnswerBook::new(), "q", &NoProgress).await;
        assert_eq!(record.used_tools(), ["get_stock_symbol".to_string()]);
    }

    #[tokio::test]
    async fn test_oracle_failure_is_errored_record() {
        let oracle = Arc::new(ScriptedOracle::new(vec![Err(OracleError::Other("401".into()))]));
        let uc = use_case(oracle, Arc::new(RecordingTools::new(vec![symbol_tool()])));
        let node = SubQuestionNode::new(1, "ticker for FPT");

        let record = uc.execute(&node, &AnswerBook::new(), "q", &NoProgress).await;
        assert_eq!(record.status(), AnswerStatus::Errored);
        assert!(record.text().contains("401"));
    }
}
