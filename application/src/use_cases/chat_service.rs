//! Chat session service.
//!
//! Owns the per-session conversation state and runs orchestration with the
//! session's rolling context. Runs on one session are serialized by the
//! session's history lock; runs on different sessions are independent.

use crate::config::{OrchestrationParams, StreamParams};
use crate::ports::progress::{NoProgress, RunProgressNotifier};
use crate::use_cases::event_stream::{EventStream, spawn_run};
use crate::use_cases::orchestrate::{
    OrchestrationError, OrchestrationReport, RunOrchestrationInput, RunOrchestrationUseCase,
};
use chrono::{DateTime, Utc};
use orchestrator_domain::{
    ConversationExchange, ConversationHistory, HistorySummary, PromptTemplate, Question,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub type SessionId = String;

/// Errors surfaced to chat callers. Messages are never empty.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChatError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<OrchestrationError> for ChatError {
    fn from(e: OrchestrationError) -> Self {
        ChatError::Internal(e.to_string())
    }
}

struct Session {
    id: SessionId,
    created_at: DateTime<Utc>,
    history: Mutex<ConversationHistory>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryView {
    pub session_id: SessionId,
    pub exchanges: Vec<ConversationExchange>,
    pub summary: HistorySummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub session_id: SessionId,
    pub created_at: DateTime<Utc>,
    pub summary: HistorySummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub active_sessions: usize,
    pub timestamp: DateTime<Utc>,
}

pub struct ChatService {
    orchestrator: Arc<RunOrchestrationUseCase>,
    sessions: RwLock<HashMap<SessionId, Arc<Session>>>,
    params: OrchestrationParams,
    stream_params: StreamParams,
}

impl ChatService {
    pub fn new(
        orchestrator: Arc<RunOrchestrationUseCase>,
        params: OrchestrationParams,
        stream_params: StreamParams,
    ) -> Self {
        Self {
            orchestrator,
            sessions: RwLock::new(HashMap::new()),
            params,
            stream_params,
        }
    }

    /// Create a session and return its id
    pub async fn init(&self) -> SessionId {
        let id = Uuid::new_v4().to_string();
        let session = Arc::new(Session {
            id: id.clone(),
            created_at: Utc::now(),
            history: Mutex::new(ConversationHistory::new(self.params.history_capacity)),
        });
        self.sessions.write().await.insert(id.clone(), session);
        info!(session = %id, "Session created");
        id
    }

    /// Answer `message` within the session and record the exchange
    pub async fn chat(&self, session_id: &str, message: &str) -> Result<OrchestrationReport, ChatError> {
        let query = validate_message(message)?;
        let session = self.session(session_id).await?;
        run_in_session(
            &self.orchestrator,
            &session,
            query,
            self.params.context_exchanges,
            &NoProgress,
        )
        .await
        .map_err(ChatError::from)
    }

    /// Like [`chat`](Self::chat), delivering progress as an event stream.
    ///
    /// Input and session errors are returned before the run starts; run
    /// failures arrive as a terminal `error` event.
    pub async fn chat_stream(&self, session_id: &str, message: &str) -> Result<EventStream, ChatError> {
        let query = validate_message(message)?;
        let session = self.session(session_id).await?;
        let orchestrator = self.orchestrator.clone();
        let context_exchanges = self.params.context_exchanges;

        Ok(spawn_run(&self.stream_params, move |progress| async move {
            run_in_session(&orchestrator, &session, query, context_exchanges, &progress)
                .await
                .map_err(|e| e.to_string())
        }))
    }

    pub async fn get_history(&self, session_id: &str) -> Result<HistoryView, ChatError> {
        let session = self.session(session_id).await?;
        let history = session.history.lock().await;
        Ok(HistoryView {
            session_id: session.id.clone(),
            exchanges: history.snapshot(),
            summary: history.summary(),
        })
    }

    pub async fn clear_history(&self, session_id: &str) -> Result<(), ChatError> {
        let session = self.session(session_id).await?;
        session.history.lock().await.clear();
        info!(session = %session_id, "History cleared");
        Ok(())
    }

    pub async fn delete_session(&self, session_id: &str) -> Result<(), ChatError> {
        self.sessions
            .write()
            .await
            .remove(session_id)
            .map(|_| info!(session = %session_id, "Session deleted"))
            .ok_or_else(|| ChatError::NotFound(session_id.to_string()))
    }

    pub async fn session_info(&self, session_id: &str) -> Result<SessionInfo, ChatError> {
        let session = self.session(session_id).await?;
        let summary = session.history.lock().await.summary();
        Ok(SessionInfo {
            session_id: session.id.clone(),
            created_at: session.created_at,
            summary,
        })
    }

    pub async fn health(&self) -> HealthStatus {
        HealthStatus {
            status: "healthy",
            active_sessions: self.sessions.read().await.len(),
            timestamp: Utc::now(),
        }
    }

    async fn session(&self, session_id: &str) -> Result<Arc<Session>, ChatError> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| ChatError::NotFound(session_id.to_string()))
    }
}

fn validate_message(message: &str) -> Result<Question, ChatError> {
    Question::try_new(message.trim()).map_err(|e| ChatError::InvalidInput(e.to_string()))
}

async fn run_in_session(
    orchestrator: &RunOrchestrationUseCase,
    session: &Session,
    query: Question,
    context_exchanges: usize,
    progress: &dyn RunProgressNotifier,
) -> Result<OrchestrationReport, OrchestrationError> {
    let mut history = session.history.lock().await;
    let context = PromptTemplate::conversation_context(history.recent(context_exchanges));
    debug!(session = %session.id, exchanges = history.len(), "Running with session context");

    let input = RunOrchestrationInput::new(query.clone()).with_context(context);
    let output = orchestrator.execute_with_progress(input, progress).await?;

    let evicted = history.append(ConversationExchange::new(
        query.into_content(),
        output.report.clone(),
        output.answered_subquestions.clone(),
    ));
    if evicted.is_some() {
        debug!(session = %session.id, "Oldest exchange evicted");
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::conversation_logger::NoConversationLogger;
    use crate::use_cases::shared::testing::{RecordingTools, ScriptedOracle};
    use orchestrator_domain::{OracleResponse, ProgressEvent};
    use std::time::Duration;

    /// Each run: decomposition, plain answer, report
    fn run_script(runs: usize) -> Vec<Result<OracleResponse, crate::ports::oracle::OracleError>> {
        (0..runs)
            .flat_map(|i| {
                vec![
                    Ok(OracleResponse::text(format!(
                        r#"{{"subquestions": [{{"id": 1, "question": "Say hello {}", "depends_on": []}}]}}"#,
                        i
                    ))),
                    Ok(OracleResponse::text(format!("hello {}", i))),
                    Ok(OracleResponse::text(format!("Report {}", i))),
                ]
            })
            .collect()
    }

    fn service(oracle: Arc<ScriptedOracle>, capacity: usize) -> ChatService {
        let params = OrchestrationParams::default().with_history_capacity(capacity);
        let orchestrator = RunOrchestrationUseCase::new(
            oracle,
            Arc::new(RecordingTools::new(vec![])),
            None,
            Arc::new(NoConversationLogger),
            &params,
        );
        ChatService::new(
            Arc::new(orchestrator),
            params,
            StreamParams::default()
                .with_chunk_delay(Duration::ZERO)
                .with_poll_interval(Duration::from_millis(5)),
        )
    }

    #[tokio::test]
    async fn test_chat_records_exchange() {
        let svc = service(Arc::new(ScriptedOracle::new(run_script(1))), 10);
        let id = svc.init().await;

        let output = svc.chat(&id, "Hello there").await.unwrap();
        assert_eq!(output.report, "Report 0");

        let history = svc.get_history(&id).await.unwrap();
        assert_eq!(history.session_id, id);
        assert_eq!(history.exchanges.len(), 1);
        assert_eq!(history.exchanges[0].user_query, "Hello there");
        assert_eq!(history.exchanges[0].answered_nodes.len(), 1);
        assert_eq!(history.summary.count, 1);
    }

    #[tokio::test]
    async fn test_history_capacity_evicts_oldest() {
        let svc = service(Arc::new(ScriptedOracle::new(run_script(3))), 2);
        let id = svc.init().await;
        for i in 0..3 {
            svc.chat(&id, &format!("message {}", i)).await.unwrap();
        }
        let history = svc.get_history(&id).await.unwrap();
        let queries: Vec<_> = history.exchanges.iter().map(|e| e.user_query.as_str()).collect();
        assert_eq!(queries, vec!["message 1", "message 2"]);
    }

    #[tokio::test]
    async fn test_context_passed_to_decomposition() {
        let oracle = Arc::new(ScriptedOracle::new(run_script(2)));
        let svc = service(oracle.clone(), 10);
        let id = svc.init().await;
        svc.chat(&id, "first question").await.unwrap();
        svc.chat(&id, "second question").await.unwrap();

        // Fourth request is the second run's decomposition
        let requests = oracle.requests.lock().unwrap();
        let prompt = &requests[3].0[1].content;
        assert!(prompt.contains("User: first question\nAssistant: Report 0"));
    }

    #[tokio::test]
    async fn test_errors() {
        let svc = service(Arc::new(ScriptedOracle::new(vec![])), 10);
        assert_eq!(
            svc.chat("missing", "hi").await.unwrap_err(),
            ChatError::NotFound("missing".into())
        );

        let id = svc.init().await;
        let err = svc.chat(&id, "   ").await.unwrap_err();
        assert!(matches!(err, ChatError::InvalidInput(_)));
        assert!(!err.to_string().is_empty());

        assert!(matches!(svc.chat_stream("missing", "hi").await, Err(ChatError::NotFound(_))));
        assert!(svc.get_history("missing").await.is_err());
        assert!(svc.clear_history("missing").await.is_err());
        assert!(svc.session_info("missing").await.is_err());
    }

    #[tokio::test]
    async fn test_graph_error_is_internal() {
        let oracle = Arc::new(ScriptedOracle::new(vec![Ok(OracleResponse::text(
            r#"[{"id": 1, "question": "a", "depends_on": [1]}]"#,
        ))]));
        let svc = service(oracle, 10);
        let id = svc.init().await;
        let err = svc.chat(&id, "loop").await.unwrap_err();
        assert!(matches!(err, ChatError::Internal(ref m) if m.contains("cycle")));
        assert_eq!(svc.get_history(&id).await.unwrap().exchanges.len(), 0);
    }

    #[tokio::test]
    async fn test_stream_ends_with_done_and_records_history() {
        let svc = service(Arc::new(ScriptedOracle::new(run_script(1))), 10);
        let id = svc.init().await;

        let mut stream = svc.chat_stream(&id, "Hello").await.unwrap();
        let mut events = Vec::new();
        while let Some(event) = stream.next().await {
            events.push(event);
        }
        assert_eq!(events.first().map(|e| e.type_name()), Some("start"));
        match events.last() {
            Some(ProgressEvent::Done { final_report, answered_subquestions }) => {
                assert_eq!(final_report, "Report 0");
                assert_eq!(answered_subquestions.len(), 1);
            }
            other => panic!("expected done, got {:?}", other),
        }
        assert_eq!(svc.get_history(&id).await.unwrap().exchanges.len(), 1);
    }

    #[tokio::test]
    async fn test_session_lifecycle_and_health() {
        let svc = service(Arc::new(ScriptedOracle::new(vec![])), 10);
        let a = svc.init().await;
        let b = svc.init().await;
        assert_ne!(a, b);
        assert_eq!(svc.health().await.active_sessions, 2);
        assert_eq!(svc.health().await.status, "healthy");

        let info = svc.session_info(&a).await.unwrap();
        assert_eq!(info.session_id, a);
        assert_eq!(info.summary.count, 0);

        svc.delete_session(&a).await.unwrap();
        assert_eq!(svc.delete_session(&a).await, Err(ChatError::NotFound(a.clone())));
        assert_eq!(svc.health().await.active_sessions, 1);
    }
}
