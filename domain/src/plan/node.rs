//! Sub-question node entity

use serde::{Deserialize, Serialize};

/// Identifier of a sub-question, unique within one request
pub type NodeId = u32;

/// One atomic unit of a decomposed query (Entity)
///
/// `text` may contain placeholder tokens such as `{{TICKER_FROM_Q1}}`
/// referring to fields produced by earlier nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubQuestionNode {
    pub id: NodeId,
    #[serde(rename = "question")]
    pub text: String,
    #[serde(default)]
    pub depends_on: Vec<NodeId>,
}

impl SubQuestionNode {
    pub fn new(id: NodeId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            depends_on: Vec::new(),
        }
    }

    /// Add dependencies, ignoring ids already present
    pub fn with_depends_on(mut self, deps: impl IntoIterator<Item = NodeId>) -> Self {
        for dep in deps {
            if !self.depends_on.contains(&dep) {
                self.depends_on.push(dep);
            }
        }
        self
    }

    pub fn is_independent(&self) -> bool {
        self.depends_on.is_empty()
    }
}
