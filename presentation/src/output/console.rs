//! Console output formatter for orchestration results

use colored::Colorize;
use orchestrator_application::{HistoryView, OrchestrationReport};
use orchestrator_domain::{AnswerRecord, AnswerStatus, ProgressEvent};
use serde_json::json;

/// Formats orchestration results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the full result: query, sub-question outcomes and the report
    pub fn format(query: &str, report: &str, records: &[AnswerRecord]) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Finance Orchestrator"));
        output.push('\n');

        output.push_str(&format!("{} {}\n", "Question:".cyan().bold(), query));

        if !records.is_empty() {
            output.push_str(&Self::section_header("Sub-questions"));
            for record in records {
                output.push_str(&Self::format_record(record));
            }
        }

        output.push_str(&Self::section_header("Report"));
        output.push_str(&format!("\n{}\n", report));

        output.push_str(&Self::footer());

        output
    }

    /// Format a completed run
    pub fn format_report(query: &str, result: &OrchestrationReport) -> String {
        Self::format(query, &result.report, &result.answered_subquestions)
    }

    /// Format as JSON: `{"final_report": .., "answered_subquestions": [..]}`
    pub fn format_json(report: &str, records: &[AnswerRecord]) -> String {
        let value = json!({
            "final_report": report,
            "answered_subquestions": records,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the report only (concise output)
    pub fn format_report_only(report: &str) -> String {
        format!("{}\n\n{}\n", "=== Report ===".cyan().bold(), report)
    }

    /// One progress event as a single JSON line
    pub fn format_event(event: &ProgressEvent) -> String {
        serde_json::to_string(event)
            .unwrap_or_else(|e| format!("{{\"type\":\"error\",\"error\":\"{}\"}}", e))
    }

    /// Format a session's conversation history
    pub fn format_history(view: &HistoryView) -> String {
        if view.exchanges.is_empty() {
            return format!("{}\n", "No conversation history yet.".dimmed());
        }

        let mut output = format!(
            "{} {} exchange(s)\n",
            "History:".cyan().bold(),
            view.summary.count
        );
        for (i, exchange) in view.exchanges.iter().enumerate() {
            output.push_str(&format!(
                "\n{} {}\n",
                format!("[{}] {}", i + 1, exchange.timestamp.format("%H:%M:%S")).yellow(),
                exchange.user_query.bold()
            ));
            output.push_str(&Self::indent(&exchange.assistant_response, "    "));
            output.push('\n');
        }
        output
    }

    fn format_record(record: &AnswerRecord) -> String {
        let icon = match record.status() {
            AnswerStatus::Ok => "v".green(),
            AnswerStatus::Skipped => "-".yellow(),
            AnswerStatus::Errored => "x".red(),
        };
        let tools = if record.used_tools().is_empty() {
            String::new()
        } else {
            format!(" ({})", record.used_tools().join(", ")).dimmed().to_string()
        };
        format!(
            "\n{} {}{}\n{}\n",
            icon,
            format!("Q{}: {}", record.id(), record.question()).bold(),
            tools,
            Self::indent(record.text(), "    ")
        )
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, Value};

    fn records() -> Vec<AnswerRecord> {
        vec![
            AnswerRecord::answered(1, "Ticker of FPT?", "FPT", vec!["get_stock_symbol".into()], Map::new()),
            AnswerRecord::skipped(2, "Price of {{TICKER_FROM_Q1}}?", &["TICKER_FROM_Q1".to_string()]),
        ]
    }

    #[test]
    fn test_format_lists_records_and_report() {
        colored::control::set_override(false);
        let output = ConsoleFormatter::format("Price of FPT?", "FPT trades at 120", &records());
        assert!(output.contains("Question: Price of FPT?"));
        assert!(output.contains("v Q1: Ticker of FPT? (get_stock_symbol)"));
        assert!(output.contains("- Q2:"));
        assert!(output.contains("SKIP: missing placeholders"));
        assert!(output.contains("FPT trades at 120"));
    }

    #[test]
    fn test_format_json_shape() {
        let output = ConsoleFormatter::format_json("done", &records());
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["final_report"], "done");
        assert_eq!(value["answered_subquestions"].as_array().unwrap().len(), 2);
        assert_eq!(value["answered_subquestions"][1]["status"], "skipped");
    }

    #[test]
    fn test_format_event_is_single_line() {
        let line = ConsoleFormatter::format_event(&ProgressEvent::Reasoning {
            message: "thinking\nhard".into(),
        });
        assert!(!line.contains('\n'));
        assert!(line.starts_with("{\"type\":\"reasoning\""));
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "  "), "  a\n  b");
    }
}
