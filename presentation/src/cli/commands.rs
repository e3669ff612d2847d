//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for run results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The final report with the answered sub-questions
    Report,
    /// Report and sub-question records as JSON
    Json,
    /// Every progress event as one JSON line
    Events,
}

impl From<OutputFormat> for orchestrator_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Report => orchestrator_domain::OutputFormat::Report,
            OutputFormat::Json => orchestrator_domain::OutputFormat::Json,
            OutputFormat::Events => orchestrator_domain::OutputFormat::Events,
        }
    }
}

/// CLI arguments for finance-orchestrator
#[derive(Parser, Debug)]
#[command(name = "finance-orchestrator")]
#[command(author, version, about = "Answer financial questions by planning sub-questions and calling data tools")]
#[command(long_about = r#"
Finance Orchestrator answers a financial question in three steps:
1. Decompose: the question is split into dependent sub-questions
2. Answer: each sub-question is answered in order, calling data tools
   (ticker lookup, prices, exchanges, currency rates, sectors, macro data)
3. Synthesize: the answers are combined into a final report

Configuration files are loaded from (in priority order):
1. ORCHESTRATOR_* environment variables
2. --config <path>     Explicit config file
3. ./orchestrator.toml Project-level config
4. ~/.config/finance-orchestrator/config.toml   Global config

Example:
  finance-orchestrator "What is the current stock price of FPT?"
  finance-orchestrator --stream -o events "Convert 100 USD to VND"
  finance-orchestrator --chat --mock
"#)]
pub struct Cli {
    /// The question to answer (not required in chat mode)
    pub question: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Render progress events live while the run executes
    #[arg(short, long)]
    pub stream: bool,

    /// Output format (defaults to the config file, then "report")
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Override the oracle model
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Use the offline mock oracle
    #[arg(long)]
    pub mock: bool,
}
