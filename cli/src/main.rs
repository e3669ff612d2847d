//! CLI entrypoint for Finance Orchestrator
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, anyhow, bail};
use clap::Parser;
use orchestrator_application::{
    ChatService, ConversationLogger, NoConversationLogger, NoProgress, RunOrchestrationInput,
    RunOrchestrationUseCase, ToolExecutorPort, ToolIndex,
};
use orchestrator_domain::{OutputFormat, Question};
use orchestrator_infrastructure::{
    ConfigLoader, FileConfig, JsonlConversationLogger, LexicalToolIndex, build_oracle,
    default_registry,
};
use orchestrator_presentation::{
    ChatRepl, Cli, ConsoleFormatter, ProgressReporter, SimpleProgress, StreamPrinter,
};
use std::io::IsTerminal;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    // Load configuration, then apply command-line overrides
    let mut config: FileConfig = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow!("Failed to load config: {}", e))?
    };
    if let Some(model) = &cli.model {
        config.oracle.model = model.clone();
    }
    if cli.mock {
        config.oracle.mock = true;
    }
    config.validate()?;

    // Guard must live until exit so buffered log lines are flushed
    let _log_guard = init_logging(cli.verbose, &config);

    info!("Starting Finance Orchestrator");

    // === Dependency Injection ===
    let oracle = build_oracle(&config.oracle);
    let registry = Arc::new(default_registry(&config.backend));
    let index: Option<Arc<dyn ToolIndex>> = match LexicalToolIndex::build(registry.tool_spec()) {
        Ok(index) => Some(Arc::new(index) as Arc<dyn ToolIndex>),
        Err(e) => {
            warn!(error = %e, "Tool index unavailable, using keyword rules only");
            None
        }
    };
    let logger: Arc<dyn ConversationLogger> = match &config.logging.conversation_log {
        Some(path) => match JsonlConversationLogger::open(path) {
            Ok(logger) => Arc::new(logger),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Conversation log disabled");
                Arc::new(NoConversationLogger)
            }
        },
        None => Arc::new(NoConversationLogger),
    };

    let params = config.orchestration_params();
    let tools: Arc<dyn ToolExecutorPort> = registry;
    let use_case = Arc::new(RunOrchestrationUseCase::new(
        oracle, tools, index, logger, &params,
    ));

    let format: OutputFormat = cli
        .output
        .map(Into::into)
        .or(config.output.format)
        .unwrap_or_default();

    // Chat mode
    if cli.chat {
        let service = Arc::new(ChatService::new(use_case, params, config.stream_params()));
        let repl = ChatRepl::new(service)
            .await
            .with_format(format)
            .with_stream(format != OutputFormat::Json)
            .with_progress(!cli.quiet);

        repl.run().await?;
        return Ok(());
    }

    // Single question mode - question is required
    let question = match cli.question {
        Some(q) => q,
        None => bail!("Question is required. Use --chat for interactive mode."),
    };

    // Streamed run: events are rendered as they arrive
    if cli.stream || format == OutputFormat::Events {
        let service = ChatService::new(use_case, params, config.stream_params());
        let session = service.init().await;
        let events = service.chat_stream(&session, &question).await?;
        let succeeded = StreamPrinter::new(question.as_str(), format)
            .with_progress(!cli.quiet)
            .print(events)
            .await;
        if !succeeded {
            bail!("Run failed");
        }
        return Ok(());
    }

    let input = RunOrchestrationInput::new(Question::try_new(question.as_str())?);

    // Execute with or without progress reporting
    let result = if cli.quiet {
        use_case.execute_with_progress(input, &NoProgress).await?
    } else if std::io::stderr().is_terminal() {
        let progress = ProgressReporter::new();
        let result = use_case.execute_with_progress(input, &progress).await;
        progress.finish();
        result?
    } else {
        use_case.execute_with_progress(input, &SimpleProgress).await?
    };

    // Output results
    let output = match format {
        OutputFormat::Json => {
            ConsoleFormatter::format_json(&result.report, &result.answered_subquestions)
        }
        _ => ConsoleFormatter::format_report(&question, &result),
    };

    println!("{}", output);

    Ok(())
}

/// Console logging on stderr, plus a daily-rotated file when
/// `[logging] file_dir` is set
fn init_logging(verbose: u8, config: &FileConfig) -> Option<WorkerGuard> {
    // RUST_LOG wins over -v flags
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    });

    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file, guard) = match &config.logging.file_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "finance-orchestrator.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .init();

    guard
}
