//! JSONL transcript of orchestration runs.
//!
//! Each [`ConversationEvent`] becomes one line:
//!
//! ```json
//! {"type":"tool_call","timestamp":"2025-01-01T00:00:00.000Z","payload":{"node":1,"tool":"get_stock_symbol"}}
//! ```
//!
//! The file is opened in append mode so transcripts of successive
//! invocations accumulate.

use orchestrator_application::{ConversationEvent, ConversationLogger};
use serde_json::json;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every line and on `Drop`.
pub struct JsonlConversationLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Open (or create) the transcript at `path`, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        debug!(path = %path.display(), "Conversation log opened");

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let record = json!({
            "type": event.event_type,
            "timestamp": chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            "payload": event.payload,
        });

        let Ok(mut writer) = self.writer.lock() else {
            return;
        };
        // Append-only: flush each line so a crash loses at most one event
        if let Err(e) = writeln!(writer, "{}", record).and_then(|_| writer.flush()) {
            warn!(path = %self.path.display(), error = %e, "Failed to write conversation log");
        }
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_envelope_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs.jsonl");
        let logger = JsonlConversationLogger::open(&path).unwrap();

        logger.log(ConversationEvent::new("user_query", json!({"query": "Price of FPT"})));
        logger.log(ConversationEvent::new(
            "tool_call",
            json!({"node": 1, "tool": "get_stock_price", "arguments": {"ticker": "FPT"}}),
        ));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "user_query");
        assert_eq!(lines[0]["payload"]["query"], "Price of FPT");
        assert!(lines[0]["timestamp"].as_str().unwrap().ends_with('Z'));
        assert_eq!(lines[1]["payload"]["arguments"]["ticker"], "FPT");
    }

    #[test]
    fn test_appends_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/dir/runs.jsonl");

        JsonlConversationLogger::open(&path)
            .unwrap()
            .log(ConversationEvent::new("final_report", json!("first")));
        JsonlConversationLogger::open(&path)
            .unwrap()
            .log(ConversationEvent::new("final_report", json!("second")));

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["payload"], "second");
    }

    #[test]
    fn test_open_fails_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        assert!(JsonlConversationLogger::open(blocker.join("runs.jsonl")).is_err());
    }
}
