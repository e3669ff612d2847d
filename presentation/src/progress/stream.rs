//! Live rendering of a streamed run

use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use orchestrator_application::EventStream;
use orchestrator_domain::{OutputFormat, ProgressEvent};
use std::time::Duration;

/// What one event turns into on the terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// Result text for stdout
    Output(String),
    /// Progress line, suppressed in quiet mode
    Progress(String),
    /// Replaces the spinner message
    Status(String),
    /// Error text for stderr
    Failure(String),
}

/// Prints the events of one streamed run as they arrive
pub struct StreamPrinter {
    query: String,
    format: OutputFormat,
    show_progress: bool,
}

impl StreamPrinter {
    pub fn new(query: impl Into<String>, format: OutputFormat) -> Self {
        Self {
            query: query.into(),
            format,
            show_progress: true,
        }
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn render(&self, event: &ProgressEvent) -> Rendered {
        if self.format == OutputFormat::Events {
            return Rendered::Output(ConsoleFormatter::format_event(event));
        }

        match event {
            ProgressEvent::Start { message } => Rendered::Status(message.clone()),
            ProgressEvent::Reasoning { message } => {
                Rendered::Progress(format!("{} {}", "~".dimmed(), message.dimmed()))
            }
            ProgressEvent::ToolCall { tool, node, .. } => {
                Rendered::Status(format!("Q{}: calling {}", node, tool))
            }
            ProgressEvent::ToolComplete { tool, node, success } => {
                let icon = if *success { "v".green() } else { "x".red() };
                Rendered::Progress(format!("   {} Q{} {}", icon, node, tool))
            }
            ProgressEvent::Content { content } => {
                Rendered::Status(format!("Writing report ({} chars)", content.chars().count()))
            }
            ProgressEvent::Done {
                final_report,
                answered_subquestions,
            } => Rendered::Output(match self.format {
                OutputFormat::Json => ConsoleFormatter::format_json(final_report, answered_subquestions),
                _ => ConsoleFormatter::format(&self.query, final_report, answered_subquestions),
            }),
            ProgressEvent::Error { error } => Rendered::Failure(error.clone()),
        }
    }

    /// Drain `stream`, printing as events arrive. Returns whether the run
    /// finished with `done`.
    pub async fn print(self, stream: EventStream) -> bool {
        let spinner = (self.show_progress && self.format != OutputFormat::Events).then(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });

        let mut succeeded = false;
        let mut events = Box::pin(stream.into_stream());
        while let Some(event) = events.next().await {
            if matches!(event, ProgressEvent::Done { .. }) {
                succeeded = true;
            }
            match self.render(&event) {
                Rendered::Output(text) => match &spinner {
                    Some(pb) if event.is_terminal() => {
                        pb.finish_and_clear();
                        println!("{}", text);
                    }
                    Some(pb) => pb.println(text),
                    None => println!("{}", text),
                },
                Rendered::Progress(text) => {
                    if let Some(pb) = &spinner {
                        pb.println(text);
                    }
                }
                Rendered::Status(message) => {
                    if let Some(pb) = &spinner {
                        pb.set_message(message);
                    }
                }
                Rendered::Failure(error) => {
                    if let Some(pb) = &spinner {
                        pb.finish_and_clear();
                    }
                    eprintln!("{} {}", "Error:".red().bold(), error);
                }
            }
        }

        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }
        succeeded
    }
}
