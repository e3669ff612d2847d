//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::ConsoleFormatter;
use crate::progress::stream::StreamPrinter;
use colored::Colorize;
use orchestrator_application::{ChatService, SessionId};
use orchestrator_domain::OutputFormat;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::sync::Arc;

/// What a slash command asks the loop to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Quit,
    Help,
    History,
    Clear,
    Unknown,
}

impl Command {
    fn parse(input: &str) -> Self {
        match input {
            "/quit" | "/exit" | "/q" => Command::Quit,
            "/help" | "/h" | "/?" => Command::Help,
            "/history" => Command::History,
            "/clear" => Command::Clear,
            _ => Command::Unknown,
        }
    }
}

/// Interactive chat REPL over one chat session
pub struct ChatRepl {
    service: Arc<ChatService>,
    session_id: SessionId,
    format: OutputFormat,
    stream: bool,
    show_progress: bool,
}

impl ChatRepl {
    /// Create a REPL bound to a fresh session of `service`
    pub async fn new(service: Arc<ChatService>) -> Self {
        let session_id = service.init().await;
        Self {
            service,
            session_id,
            format: OutputFormat::Report,
            stream: true,
            show_progress: true,
        }
    }

    /// Set whether to show progress
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Set whether answers are rendered live from the event stream
    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        // Try to load history
        let history_path = dirs::data_dir().map(|p| p.join("finance-orchestrator").join("history.txt"));

        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            let readline = rl.readline(">>> ");

            match readline {
                Ok(line) => {
                    let line = line.trim();

                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        if self.handle_command(line).await {
                            break;
                        }
                        continue;
                    }

                    let _ = rl.add_history_entry(line);

                    self.process_question(line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }
        if let Err(e) = self.service.delete_session(&self.session_id).await {
            tracing::debug!(error = %e, "Session already gone");
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│       Finance Orchestrator - Chat Mode      │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Session: {}", self.session_id.dimmed());
        println!();
        Self::print_commands();
    }

    fn print_commands() {
        println!("Commands:");
        println!("  /help, /h, /?    - Show this help");
        println!("  /history         - Show this session's exchanges");
        println!("  /clear           - Forget this session's exchanges");
        println!("  /quit, /exit, /q - Exit chat");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    async fn handle_command(&self, cmd: &str) -> bool {
        match Command::parse(cmd) {
            Command::Quit => {
                println!("Bye!");
                true
            }
            Command::Help => {
                println!();
                Self::print_commands();
                false
            }
            Command::History => {
                match self.service.get_history(&self.session_id).await {
                    Ok(view) => println!("{}", ConsoleFormatter::format_history(&view)),
                    Err(e) => eprintln!("Error: {}", e),
                }
                false
            }
            Command::Clear => {
                match self.service.clear_history(&self.session_id).await {
                    Ok(()) => println!("History cleared."),
                    Err(e) => eprintln!("Error: {}", e),
                }
                false
            }
            Command::Unknown => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
                false
            }
        }
    }

    async fn process_question(&self, question: &str) {
        println!();

        if self.stream {
            match self.service.chat_stream(&self.session_id, question).await {
                Ok(events) => {
                    StreamPrinter::new(question, self.format)
                        .with_progress(self.show_progress)
                        .print(events)
                        .await;
                }
                Err(e) => eprintln!("Error: {}", e),
            }
        } else {
            match self.service.chat(&self.session_id, question).await {
                Ok(result) => {
                    let output = match self.format {
                        OutputFormat::Report => ConsoleFormatter::format_report_only(&result.report),
                        _ => ConsoleFormatter::format_json(&result.report, &result.answered_subquestions),
                    };
                    println!("{}", output);
                }
                Err(e) => eprintln!("Error: {}", e),
            }
        }
        println!();
    }
}
