//! Prompt templates for decomposition, per-node answering and synthesis

use crate::conversation::ConversationExchange;
use crate::core::string::truncate;
use crate::plan::{AnswerRecord, NodeId};
use chrono::{DateTime, Utc};

/// Marker present in every decomposition request
pub const DECOMPOSITION_MARKER: &str = "Break the user's query into sub-questions";

/// Marker present in every synthesis request
pub const SYNTHESIS_MARKER: &str = "Write the final report";

/// Prefix of the assistant message that feeds a tool result back
pub const TOOL_RESULT_PREFIX: &str = "Tool ";

const CONTEXT_RESPONSE_MAX_LEN: usize = 400;

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for decomposition
    pub fn decomposition_system() -> String {
        format!(
            r#"You are a financial analysis assistant. {}.

Rules:
- Each sub-question is an object: {{"id": int, "question": str, "depends_on": [int]}}
- When a sub-question needs a value produced by an earlier one, reference it
  with a placeholder such as {{{{TICKER_FROM_Q1}}}}, {{{{PRICE_FROM_Q2}}}}, {{{{DATA_FROM_Q3}}}}
  and list that id in "depends_on".
- Keep sub-questions atomic: one lookup or calculation each.
- A simple query may have a single sub-question.

Always answer with JSON only:
{{
  "subquestions": [
    {{"id": 1, "question": "...", "depends_on": []}}
  ]
}}"#,
            DECOMPOSITION_MARKER
        )
    }

    /// User prompt for decomposition, including recent conversation
    pub fn decomposition_query(query: &str, context: &str) -> String {
        if context.is_empty() {
            format!("User query:\n{}", query)
        } else {
            format!(
                "Recent conversation:\n{}\n\nUser query:\n{}",
                context, query
            )
        }
    }

    /// Render the most recent exchanges as rolling context
    pub fn conversation_context<'a>(
        exchanges: impl IntoIterator<Item = &'a ConversationExchange>,
    ) -> String {
        exchanges
            .into_iter()
            .map(|e| {
                format!(
                    "User: {}\nAssistant: {}",
                    e.user_query,
                    truncate(&e.assistant_response, CONTEXT_RESPONSE_MAX_LEN)
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// System prompt for answering one sub-question
    pub fn subquestion_system() -> &'static str {
        r#"You are a financial assistant answering one step of a larger analysis.
If one of the offered tools can fetch or compute the answer, call it.
Otherwise answer directly and concisely."#
    }

    /// User prompt for answering one sub-question
    pub fn subquestion_prompt(
        id: NodeId,
        question: &str,
        dependencies: &[&AnswerRecord],
        user_query: &str,
        now: DateTime<Utc>,
    ) -> String {
        let deps = serde_json::to_string(dependencies).unwrap_or_else(|_| "[]".to_string());
        format!(
            r#"Current time (UTC): {}

Sub-question ID: {}
Question: {}
Data from earlier sub-questions: {}
Original user query: {}"#,
            now.to_rfc3339(),
            id,
            question,
            deps,
            user_query
        )
    }

    /// Assistant message carrying a tool result back to the oracle
    pub fn tool_result(tool: &str, data: &serde_json::Value) -> String {
        format!("{}{} returned: {}", TOOL_RESULT_PREFIX, tool, data)
    }

    /// System prompt for the final synthesis
    pub fn synthesis_system() -> &'static str {
        "You are a financial assistant. Combine step results into a clear answer for the user."
    }

    /// User prompt for the final synthesis
    pub fn synthesis_prompt(user_query: &str, records: &[AnswerRecord]) -> String {
        let results = serde_json::to_string_pretty(records).unwrap_or_else(|_| "[]".to_string());
        format!(
            r#"{}.

Original question:
{}

Sub-questions and results (status is ok, skipped or errored):
{}

Answer the original question using the results above. Mention any
information that could not be determined and why."#,
            SYNTHESIS_MARKER, user_query, results
        )
    }
}
