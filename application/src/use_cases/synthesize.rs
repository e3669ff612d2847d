//! Synthesize Report use case.
//!
//! Turns all answer records (including skipped and errored ones) into the
//! final narrative. The report is never empty: a blank or failed oracle
//! reply is replaced by a plain summary of the records.

use crate::ports::oracle::Oracle;
use crate::use_cases::shared::generate_with_timeout;
use orchestrator_domain::{AnswerRecord, AnswerStatus, Message, PromptTemplate};
use std::fmt::Write;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub struct SynthesizeReportUseCase {
    oracle: Arc<dyn Oracle>,
    timeout: Duration,
}

impl SynthesizeReportUseCase {
    pub fn new(oracle: Arc<dyn Oracle>, timeout: Duration) -> Self {
        Self { oracle, timeout }
    }

    pub async fn execute(&self, user_query: &str, records: &[AnswerRecord]) -> String {
        let messages = [
            Message::system(PromptTemplate::synthesis_system()),
            Message::user(PromptTemplate::synthesis_prompt(user_query, records)),
        ];

        match generate_with_timeout(self.oracle.as_ref(), &messages, None, self.timeout).await {
            Ok(response) if !response.is_blank() => {
                info!(records = records.len(), "Report synthesized");
                response.text_or_empty().to_string()
            }
            Ok(_) => {
                warn!("Oracle returned an empty report, summarizing records");
                summarize_records(user_query, records)
            }
            Err(e) => {
                warn!(error = %e, "Synthesis failed, summarizing records");
                summarize_records(user_query, records)
            }
        }
    }
}

/// Plain-text report built from the records alone
pub fn summarize_records(user_query: &str, records: &[AnswerRecord]) -> String {
    let mut report = format!("Results for: {}\n", user_query);
    if records.is_empty() {
        report.push_str("\nNo information could be determined for this query.");
        return report;
    }

    for record in records {
        let marker = match record.status() {
            AnswerStatus::Ok => "",
            AnswerStatus::Skipped => " (not determined)",
            AnswerStatus::Errored => " (failed)",
        };
        let _ = write!(report, "\n- Q{}{}: {}\n  {}", record.id(), marker, record.question(), record.text());
    }

    let unresolved = records.iter().filter(|r| !r.is_ok()).count();
    if unresolved > 0 {
        let _ = write!(
            report,
            "\n\n{} of {} sub-questions could not be answered.",
            unresolved,
            records.len()
        );
    }
    report
}
