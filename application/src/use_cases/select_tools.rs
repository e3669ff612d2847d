//! Tool selection for a resolved sub-question.
//!
//! Merges semantic hits from the optional [`ToolIndex`] with deterministic
//! keyword rules. Only registered tools are returned.

use crate::ports::tool_executor::ToolExecutorPort;
use crate::ports::tool_index::ToolIndex;
use orchestrator_domain::{keyword_hits, merge_candidates};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct ToolSelector {
    tools: Arc<dyn ToolExecutorPort>,
    index: Option<Arc<dyn ToolIndex>>,
    top_k: usize,
}

impl ToolSelector {
    pub fn new(tools: Arc<dyn ToolExecutorPort>, index: Option<Arc<dyn ToolIndex>>, top_k: usize) -> Self {
        Self { tools, index, top_k }
    }

    /// Candidate tool names for `text`, highest priority first
    pub async fn select(&self, text: &str) -> Vec<String> {
        let semantic = self.semantic_hits(text).await;
        let keywords: Vec<&str> = keyword_hits(text)
            .into_iter()
            .filter(|name| self.tools.has_tool(name))
            .collect();

        let candidates = merge_candidates(&keywords, &semantic);
        debug!(?keywords, ?semantic, ?candidates, "Selected tools");
        candidates
    }

    async fn semantic_hits(&self, text: &str) -> Vec<String> {
        let Some(index) = &self.index else {
            debug!("No tool index, keyword rules only");
            return Vec::new();
        };
        match index.search(text, self.top_k).await {
            Ok(hits) => hits
                .into_iter()
                .filter(|name| self.tools.has_tool(name))
                .collect(),
            Err(e) => {
                warn!(error = %e, "Tool index search failed, keyword rules only");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::tool_index::IndexError;
    use crate::use_cases::shared::testing::{RecordingTools, StaticTool};
    use async_trait::async_trait;
    use orchestrator_domain::ToolDefinition;
    use serde_json::json;

    struct FixedIndex(Result<Vec<String>, IndexError>);

    #[async_trait]
    impl ToolIndex for FixedIndex {
        async fn search(&self, _text: &str, k: usize) -> Result<Vec<String>, IndexError> {
            self.0.clone().map(|hits| hits.into_iter().take(k).collect())
        }
    }

    fn registry(names: &[&str]) -> Arc<dyn ToolExecutorPort> {
        Arc::new(RecordingTools::new(
            names
                .iter()
                .map(|n| StaticTool::ok(ToolDefinition::new(*n, "tool"), json!({})))
                .collect(),
        ))
    }

    fn index(hits: &[&str]) -> Option<Arc<dyn ToolIndex>> {
        Some(Arc::new(FixedIndex(Ok(hits.iter().map(|s| s.to_string()).collect()))))
    }

    #[tokio::test]
    async fn test_keyword_hits_come_first() {
        let tools = registry(&["get_stock_price", "get_macro_data", "get_stock_symbol"]);
        let selector = ToolSelector::new(tools, index(&["get_macro_data", "get_stock_price"]), 4);
        let selected = selector.select("What is the current price of FPT?").await;
        assert_eq!(selected, vec!["get_stock_price", "get_macro_data"]);
    }

    #[tokio::test]
    async fn test_unregistered_names_dropped() {
        let tools = registry(&["get_stock_symbol"]);
        let selector = ToolSelector::new(tools, index(&["web_search", "get_stock_symbol"]), 4);
        // "price" matches get_stock_price, which is not registered
        let selected = selector.select("ticker and price").await;
        assert_eq!(selected, vec!["get_stock_symbol"]);
    }

    #[tokio::test]
    async fn test_index_failure_degrades_to_keywords() {
        let tools = registry(&["get_stock_symbol", "get_macro_data"]);
        let failing: Option<Arc<dyn ToolIndex>> = Some(Arc::new(FixedIndex(Err(
            IndexError::Unavailable("not built".into()),
        ))));
        let selector = ToolSelector::new(tools, failing, 4);
        assert_eq!(selector.select("ticker for FPT").await, vec!["get_stock_symbol"]);
    }

    #[tokio::test]
    async fn test_no_index_and_no_keywords_is_empty() {
        let selector = ToolSelector::new(registry(&["get_stock_symbol"]), None, 4);
        assert!(selector.select("Tell me a joke").await.is_empty());
    }

    #[tokio::test]
    async fn test_top_k_limits_semantic_hits() {
        let tools = registry(&["a", "b", "c"]);
        let selector = ToolSelector::new(tools, index(&["a", "b", "c"]), 2);
        assert_eq!(selector.select("nothing matches here").await, vec!["a", "b"]);
    }
}
