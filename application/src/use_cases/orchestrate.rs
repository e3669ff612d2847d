//! Run Orchestration use case
//!
//! Drives one full run: decompose, schedule, answer each node in order,
//! synthesize. Only an invalid dependency graph aborts a run; every other
//! failure is recorded in the affected node's answer.

use crate::config::OrchestrationParams;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::oracle::Oracle;
use crate::ports::progress::{NoProgress, RunProgressNotifier};
use crate::ports::tool_executor::ToolExecutorPort;
use crate::ports::tool_index::ToolIndex;
use crate::use_cases::answer_subquestion::AnswerSubQuestionUseCase;
use crate::use_cases::decompose::DecomposeQueryUseCase;
use crate::use_cases::dispatch::ToolDispatcher;
use crate::use_cases::select_tools::ToolSelector;
use crate::use_cases::synthesize::SynthesizeReportUseCase;
use orchestrator_domain::{AnswerBook, AnswerRecord, GraphError, NodeId, Question, schedule};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info, warn};

/// Errors that abort a whole run
#[derive(Error, Debug, Clone)]
pub enum OrchestrationError {
    #[error("Invalid sub-question graph: {0}")]
    Graph(#[from] GraphError),
}

/// Input for the RunOrchestration use case
#[derive(Debug, Clone)]
pub struct RunOrchestrationInput {
    pub query: Question,
    /// Rendered recent exchanges for the decomposition prompt
    pub context: String,
}

impl RunOrchestrationInput {
    pub fn new(query: Question) -> Self {
        Self {
            query,
            context: String::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }
}

/// Outcome of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct OrchestrationReport {
    pub report: String,
    pub answered_subquestions: Vec<AnswerRecord>,
    /// Node ids in execution order
    #[serde(skip)]
    pub order: Vec<NodeId>,
    /// Whether decomposition fell back to the query itself
    #[serde(skip)]
    pub fallback_plan: bool,
}

pub struct RunOrchestrationUseCase {
    decompose: DecomposeQueryUseCase,
    answer: AnswerSubQuestionUseCase,
    synthesize: SynthesizeReportUseCase,
    logger: Arc<dyn ConversationLogger>,
}

impl RunOrchestrationUseCase {
    pub fn new(
        oracle: Arc<dyn Oracle>,
        tools: Arc<dyn ToolExecutorPort>,
        index: Option<Arc<dyn ToolIndex>>,
        logger: Arc<dyn ConversationLogger>,
        params: &OrchestrationParams,
    ) -> Self {
        let selector = ToolSelector::new(tools.clone(), index, params.top_k);
        let dispatcher = ToolDispatcher::new(tools.clone(), params.tool_timeout);
        Self {
            decompose: DecomposeQueryUseCase::new(oracle.clone(), logger.clone(), params.oracle_timeout),
            answer: AnswerSubQuestionUseCase::new(
                oracle.clone(),
                tools,
                selector,
                dispatcher,
                logger.clone(),
                params.oracle_timeout,
            ),
            synthesize: SynthesizeReportUseCase::new(oracle, params.oracle_timeout),
            logger,
        }
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunOrchestrationInput) -> Result<OrchestrationReport, OrchestrationError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunOrchestrationInput,
        progress: &dyn RunProgressNotifier,
    ) -> Result<OrchestrationReport, OrchestrationError> {
        let started = Instant::now();
        let query = input.query.content();
        info!(query = %query, "Starting orchestration run");
        self.logger
            .log(ConversationEvent::new("user_query", json!({ "query": query })));
        progress.on_run_start(query).await;

        // Phase 1: Decomposition
        let decomposition = self.decompose.execute(query, &input.context).await;

        // Phase 2: Scheduling
        let ordered = schedule(&decomposition.nodes).map_err(|e| {
            error!(kind = e.kind(), error = %e, "Sub-question graph rejected");
            e
        })?;
        let order: Vec<NodeId> = ordered.iter().map(|n| n.id).collect();
        info!(?order, "Scheduled sub-questions");
        progress.on_plan_ready(&ordered).await;

        // Phase 3: Answer each node in order
        let mut answers = AnswerBook::new();
        for node in &ordered {
            let record = self.answer.execute(node, &answers, query, progress).await;
            info!(node = record.id(), status = %record.status(), "Sub-question processed");
            self.logger.log(ConversationEvent::new("node_answer", json!(record)));
            progress.on_node_complete(&record).await;
            if !answers.insert(record) {
                warn!(node = node.id, "Duplicate answer ignored");
            }
        }

        // Phase 4: Synthesis
        progress.on_synthesis_start().await;
        let report = self.synthesize.execute(query, answers.records()).await;
        self.logger.log(ConversationEvent::new(
            "final_report",
            json!({ "report": report, "answered": answers.len() }),
        ));
        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            nodes = answers.len(),
            "Orchestration run complete"
        );

        Ok(OrchestrationReport {
            report,
            answered_subquestions: answers.into_records(),
            order,
            fallback_plan: decomposition.is_fallback(),
        })
    }
}
