//! Answer records produced per sub-question

use super::node::NodeId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outcome of processing one sub-question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerStatus {
    Ok,
    Skipped,
    Errored,
}

impl AnswerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerStatus::Ok => "ok",
            AnswerStatus::Skipped => "skipped",
            AnswerStatus::Errored => "errored",
        }
    }
}

impl std::fmt::Display for AnswerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The answer to one sub-question (Entity)
///
/// Created exactly once per node per run and immutable afterwards: fields
/// are only reachable through accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    id: NodeId,
    question: String,
    text: String,
    used_tools: Vec<String>,
    extracted_data: Map<String, Value>,
    status: AnswerStatus,
}

impl AnswerRecord {
    /// A successfully answered node.
    pub fn answered(
        id: NodeId,
        question: impl Into<String>,
        text: impl Into<String>,
        used_tools: Vec<String>,
        extracted_data: Map<String, Value>,
    ) -> Self {
        Self {
            id,
            question: question.into(),
            text: text.into(),
            used_tools,
            extracted_data,
            status: AnswerStatus::Ok,
        }
    }

    /// A node skipped because placeholders could not be resolved.
    pub fn skipped(id: NodeId, question: impl Into<String>, missing: &[String]) -> Self {
        Self {
            id,
            question: question.into(),
            text: format!("SKIP: missing placeholders [{}]", missing.join(", ")),
            used_tools: Vec::new(),
            extracted_data: Map::new(),
            status: AnswerStatus::Skipped,
        }
    }

    /// A node whose tool invocation failed. The attempted tool is still
    /// listed in `used_tools`.
    pub fn tool_failed(
        id: NodeId,
        question: impl Into<String>,
        tool: impl Into<String>,
        message: impl std::fmt::Display,
    ) -> Self {
        let tool = tool.into();
        Self {
            id,
            question: question.into(),
            text: format!("ERROR executing tool {}: {}", tool, message),
            used_tools: vec![tool],
            extracted_data: Map::new(),
            status: AnswerStatus::Errored,
        }
    }

    /// A node that failed before any tool ran (e.g. the oracle was unreachable).
    pub fn failed(id: NodeId, question: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id,
            question: question.into(),
            text: message.into(),
            used_tools: Vec::new(),
            extracted_data: Map::new(),
            status: AnswerStatus::Errored,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The resolved question text this record answers.
    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn used_tools(&self) -> &[String] {
        &self.used_tools
    }

    pub fn extracted_data(&self) -> &Map<String, Value> {
        &self.extracted_data
    }

    pub fn status(&self) -> AnswerStatus {
        self.status
    }

    pub fn is_ok(&self) -> bool {
        self.status == AnswerStatus::Ok
    }
}

/// Answer records of one run, in the order nodes were processed.
#[derive(Debug, Clone, Default)]
pub struct AnswerBook {
    records: Vec<AnswerRecord>,
}

impl AnswerBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer. Returns `false` (and keeps the existing record)
    /// if the node was already answered.
    pub fn insert(&mut self, record: AnswerRecord) -> bool {
        if self.get(record.id()).is_some() {
            return false;
        }
        self.records.push(record);
        true
    }

    pub fn get(&self, id: NodeId) -> Option<&AnswerRecord> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Records of the given ids that have already been answered
    pub fn collect(&self, ids: &[NodeId]) -> Vec<&AnswerRecord> {
        ids.iter().filter_map(|id| self.get(*id)).collect()
    }

    pub fn records(&self) -> &[AnswerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<AnswerRecord> {
        self.records
    }
}
