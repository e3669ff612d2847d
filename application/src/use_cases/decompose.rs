//! Decompose Query use case.
//!
//! Asks the oracle to break a query into sub-questions. A malformed or
//! missing reply never fails the run: the query itself becomes the single
//! sub-question.

use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::oracle::Oracle;
use crate::use_cases::shared::generate_with_timeout;
use orchestrator_domain::util::truncate_str;
use orchestrator_domain::{Message, PromptTemplate, SubQuestionNode, fallback_plan, parse_subquestions};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Result of a decomposition request
#[derive(Debug, Clone)]
pub struct Decomposition {
    pub nodes: Vec<SubQuestionNode>,
    /// Why the fallback plan was used, if it was
    pub fallback_reason: Option<String>,
}

impl Decomposition {
    pub fn is_fallback(&self) -> bool {
        self.fallback_reason.is_some()
    }
}

pub struct DecomposeQueryUseCase {
    oracle: Arc<dyn Oracle>,
    logger: Arc<dyn ConversationLogger>,
    timeout: Duration,
}

impl DecomposeQueryUseCase {
    pub fn new(
        oracle: Arc<dyn Oracle>,
        logger: Arc<dyn ConversationLogger>,
        timeout: Duration,
    ) -> Self {
        Self {
            oracle,
            logger,
            timeout,
        }
    }

    /// Decompose `query`, with `context` being rendered recent exchanges
    pub async fn execute(&self, query: &str, context: &str) -> Decomposition {
        let messages = [
            Message::system(PromptTemplate::decomposition_system()),
            Message::user(PromptTemplate::decomposition_query(query, context)),
        ];

        let raw = match generate_with_timeout(self.oracle.as_ref(), &messages, None, self.timeout).await
        {
            Ok(response) => response.text.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Decomposition request failed, using single sub-question");
                return self.fallback(query, format!("oracle error: {}", e));
            }
        };

        match parse_subquestions(&raw) {
            Ok(nodes) => {
                info!(count = nodes.len(), "Query decomposed");
                debug!(?nodes, "Decomposition");
                self.logger.log(ConversationEvent::new(
                    "decomposition",
                    json!({ "subquestions": nodes, "fallback": false }),
                ));
                Decomposition {
                    nodes,
                    fallback_reason: None,
                }
            }
            Err(e) => {
                warn!(
                    error = %e,
                    raw = truncate_str(&raw, 200),
                    "Failed to parse decomposition, using single sub-question"
                );
                self.fallback(query, e.to_string())
            }
        }
    }

    fn fallback(&self, query: &str, reason: String) -> Decomposition {
        let nodes = fallback_plan(query);
        self.logger.log(ConversationEvent::new(
            "decomposition",
            json!({ "subquestions": nodes, "fallback": true, "reason": reason }),
        ));
        Decomposition {
            nodes,
            fallback_reason: Some(reason),
        }
    }
}
