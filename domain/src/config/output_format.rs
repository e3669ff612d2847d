//! Output format value object

use serde::{Deserialize, Serialize};

/// How a run's result is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Only the final report (default)
    #[default]
    Report,
    /// Report plus answered sub-questions as JSON
    Json,
    /// Every progress event as one JSON line
    Events,
}
