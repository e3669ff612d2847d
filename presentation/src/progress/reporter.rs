//! Progress reporting for orchestration runs

use async_trait::async_trait;
use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use orchestrator_application::RunProgressNotifier;
use orchestrator_domain::{AnswerRecord, AnswerStatus, NodeId, SubQuestionNode};
use std::time::Duration;

/// Reports progress with a spinner, printing plan and node lines above it
pub struct ProgressReporter {
    multi: MultiProgress,
    spinner: ProgressBar,
}

impl ProgressReporter {
    pub fn new() -> Self {
        let multi = MultiProgress::new();
        let spinner = multi.add(ProgressBar::new_spinner());
        spinner.set_style(Self::spinner_style());
        spinner.enable_steady_tick(Duration::from_millis(100));
        Self { multi, spinner }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn line(&self, text: String) {
        // Only fails when the draw target is hidden
        let _ = self.multi.println(text);
    }

    /// Stop the spinner and clear it from the terminal
    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }

    pub(crate) fn status_icon(status: AnswerStatus) -> colored::ColoredString {
        match status {
            AnswerStatus::Ok => "v".green(),
            AnswerStatus::Skipped => "-".yellow(),
            AnswerStatus::Errored => "x".red(),
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

#[async_trait]
impl RunProgressNotifier for ProgressReporter {
    async fn on_run_start(&self, _query: &str) {
        self.spinner.set_prefix("Planning");
        self.spinner.set_message("Breaking the question down...");
    }

    async fn on_plan_ready(&self, ordered: &[SubQuestionNode]) {
        self.line(format!(
            "{} {} sub-question(s)",
            "->".cyan(),
            ordered.len().to_string().bold()
        ));
        for node in ordered {
            self.line(format!("   Q{}: {}", node.id, node.text));
        }
        self.spinner.set_prefix("Answering");
    }

    async fn on_node_start(&self, node: NodeId, resolved: &str) {
        self.spinner.set_message(format!("Q{}: {}", node, resolved));
    }

    async fn on_tool_call(&self, node: NodeId, tool: &str, _question: &str) {
        self.spinner.set_message(format!("Q{}: calling {}", node, tool));
    }

    async fn on_tool_complete(&self, node: NodeId, tool: &str, success: bool) {
        if !success {
            self.line(format!("   {} Q{}: {} failed", "x".red(), node, tool));
        }
    }

    async fn on_node_complete(&self, record: &AnswerRecord) {
        self.line(format!(
            "   {} Q{} {}",
            Self::status_icon(record.status()),
            record.id(),
            record.status().as_str().dimmed()
        ));
    }

    async fn on_synthesis_start(&self) {
        self.spinner.set_prefix("Synthesizing");
        self.spinner.set_message("Writing the final report...");
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

#[async_trait]
impl RunProgressNotifier for SimpleProgress {
    async fn on_plan_ready(&self, ordered: &[SubQuestionNode]) {
        println!(
            "{} {} ({} sub-questions)",
            "->".cyan(),
            "Plan".bold(),
            ordered.len()
        );
        for node in ordered {
            println!("   Q{}: {}", node.id, node.text);
        }
    }

    async fn on_tool_call(&self, node: NodeId, tool: &str, _question: &str) {
        println!("  Q{} {} {}", node, "calling".dimmed(), tool);
    }

    async fn on_node_complete(&self, record: &AnswerRecord) {
        println!(
            "  {} Q{} ({})",
            ProgressReporter::status_icon(record.status()),
            record.id(),
            record.status()
        );
    }

    async fn on_synthesis_start(&self) {
        println!("{} {}", "->".cyan(), "Synthesizing report".bold());
        println!();
    }
}
