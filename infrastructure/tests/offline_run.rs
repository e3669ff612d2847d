//! Offline runs through the shipped adapters: mock oracle, default tool
//! registry and lexical index, with the market backend served by wiremock.

use orchestrator_application::{
    ChatService, NoConversationLogger, OrchestrationParams, RunOrchestrationInput,
    RunOrchestrationUseCase, StreamParams, ToolExecutorPort, ToolIndex,
};
use orchestrator_domain::{AnswerStatus, Question};
use orchestrator_infrastructure::{FileBackendConfig, LexicalToolIndex, MockOracle, default_registry};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn price_backend() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/market/ticker-detail"))
        .and(query_param("symbol", "FPT"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"symbol": "FPT", "close": 120500})),
        )
        .mount(&server)
        .await;
    server
}

fn offline_use_case(server: &MockServer) -> RunOrchestrationUseCase {
    let backend = FileBackendConfig {
        base_url: server.uri(),
        ..FileBackendConfig::default()
    };
    let registry = Arc::new(default_registry(&backend));
    let index = LexicalToolIndex::build(registry.tool_spec()).unwrap();
    RunOrchestrationUseCase::new(
        Arc::new(MockOracle::new()),
        registry,
        Some(Arc::new(index) as Arc<dyn ToolIndex>),
        Arc::new(NoConversationLogger),
        &OrchestrationParams::default(),
    )
}

#[tokio::test]
async fn test_ticker_then_price_for_fpt() {
    let server = price_backend().await;
    let use_case = offline_use_case(&server);

    let query = Question::try_new("Find the ticker and price for FPT").unwrap();
    let result = use_case.execute(RunOrchestrationInput::new(query)).await.unwrap();

    assert_eq!(result.order, vec![1, 2]);
    assert!(!result.fallback_plan);

    let records = &result.answered_subquestions;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].question(), "What is the stock ticker symbol of FPT?");
    assert_eq!(records[0].status(), AnswerStatus::Ok);
    assert_eq!(records[0].used_tools(), ["get_stock_symbol"]);
    assert_eq!(records[0].extracted_data()["ticker"], "FPT");

    assert_eq!(records[1].question(), "What is the current stock price of FPT?");
    assert_eq!(records[1].status(), AnswerStatus::Ok);
    assert_eq!(records[1].used_tools(), ["get_stock_price"]);
    assert_eq!(records[1].extracted_data()["price"], json!(120500));

    assert!(!result.report.trim().is_empty());
    assert!(result.report.contains("FPT"));
    assert!(result.report.contains("120500"));
}

#[tokio::test]
async fn test_backend_down_marks_price_node_errored() {
    let server = MockServer::start().await;
    let use_case = offline_use_case(&server);

    let query = Question::try_new("Find the ticker and price for FPT").unwrap();
    let result = use_case.execute(RunOrchestrationInput::new(query)).await.unwrap();

    let price = &result.answered_subquestions[1];
    assert_eq!(price.question(), "What is the current stock price of FPT?");
    assert_eq!(price.status(), AnswerStatus::Errored);
    assert!(price.text().starts_with("ERROR executing tool get_stock_price"));
    assert!(!result.report.trim().is_empty());
}

#[tokio::test]
async fn test_chat_session_records_exchange() {
    let server = price_backend().await;
    let service = ChatService::new(
        Arc::new(offline_use_case(&server)),
        OrchestrationParams::default(),
        StreamParams::default(),
    );
    let session = service.init().await;

    let result = service
        .chat(&session, "Find the ticker and price for FPT")
        .await
        .unwrap();
    assert!(result.report.contains("FPT"));

    let history = service.get_history(&session).await.unwrap();
    assert_eq!(history.summary.count, 1);
    assert_eq!(history.exchanges[0].user_query, "Find the ticker and price for FPT");
}
