//! Term-frequency vector index over tool descriptors
//!
//! Each descriptor is embedded as the term counts of
//! `Tool: <name>\nDescription: <desc>\nParams: <params>`; queries are ranked
//! by cosine similarity and zero-similarity hits are dropped.

use std::collections::HashMap;

use async_trait::async_trait;
use orchestrator_application::ports::tool_index::{IndexError, ToolIndex};
use orchestrator_domain::{ToolDefinition, ToolSpec};
use tracing::debug;

type TermVector = HashMap<String, f32>;

/// Lower-cased alphanumeric runs; `_` separates words
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

fn embed(text: &str) -> TermVector {
    let mut vector = TermVector::new();
    for token in tokenize(text) {
        *vector.entry(token).or_insert(0.0) += 1.0;
    }
    vector
}

fn norm(vector: &TermVector) -> f32 {
    vector.values().map(|v| v * v).sum::<f32>().sqrt()
}

pub fn cosine_similarity(a: &TermVector, b: &TermVector) -> f32 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f32 = small
        .iter()
        .filter_map(|(term, x)| large.get(term).map(|y| x * y))
        .sum();
    let (norm_a, norm_b) = (norm(a), norm(b));
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

fn descriptor_text(tool: &ToolDefinition) -> String {
    let params = tool
        .parameters
        .iter()
        .map(|p| format!("{} ({})", p.name, p.description))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Tool: {}\nDescription: {}\nParams: {}",
        tool.name, tool.description, params
    )
}

pub struct LexicalToolIndex {
    entries: Vec<(String, TermVector)>,
}

impl LexicalToolIndex {
    /// Fails on an empty spec; callers then select tools by keywords only
    pub fn build(spec: &ToolSpec) -> Result<Self, IndexError> {
        if spec.is_empty() {
            return Err(IndexError::Unavailable("no tools to index".to_string()));
        }
        let entries = spec
            .all()
            .map(|tool| (tool.name.clone(), embed(&descriptor_text(tool))))
            .collect::<Vec<_>>();
        debug!(tools = entries.len(), "Built lexical tool index");
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl ToolIndex for LexicalToolIndex {
    async fn search(&self, text: &str, k: usize) -> Result<Vec<String>, IndexError> {
        let query = embed(text);
        let mut scored: Vec<(&str, f32)> = self
            .entries
            .iter()
            .map(|(name, vector)| (name.as_str(), cosine_similarity(&query, vector)))
            .filter(|(_, score)| *score > 0.0)
            .collect();
        // Stable sort keeps registration order among ties
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        Ok(scored
            .into_iter()
            .take(k)
            .map(|(name, _)| name.to_string())
            .collect())
    }
}
