//! `web_search` tool backed by the search pipeline
//!
//! The model passes a list of queries; the tool returns the deduplicated,
//! summarized and formatted sources as one string.

use crate::research::schema::{parameters_for, WebSearchArgs};
use crate::search::{SearchPipeline, SearchTopic};
use crate::tools::registry::Tool;
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Values used when the model leaves `max_results` or `topic` out. `max_results`
/// also caps what the model may ask for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchDefaults {
    pub max_results: usize,
    pub topic: SearchTopic,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            max_results: 3,
            topic: SearchTopic::General,
        }
    }
}

pub struct WebSearchTool {
    pipeline: Arc<SearchPipeline>,
    defaults: SearchDefaults,
}

impl WebSearchTool {
    pub fn new(pipeline: Arc<SearchPipeline>, defaults: SearchDefaults) -> Self {
        Self { pipeline, defaults }
    }

    /// The configured count is both the default and the ceiling.
    fn result_limit(&self, requested: Option<usize>) -> usize {
        let ceiling = self.defaults.max_results.max(1);
        requested.map_or(ceiling, |n| n.clamp(1, ceiling))
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Fetch results from a web search engine. Returns summarized sources for all queries, \
         with duplicate URLs removed."
    }

    fn parameters_schema(&self) -> Value {
        parameters_for::<WebSearchArgs>()
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let args: WebSearchArgs = serde_json::from_value(args)
            .map_err(|e| AppError::InvalidInput(format!("Invalid web_search arguments: {}", e)))?;

        let queries: Vec<String> = args
            .queries
            .into_iter()
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .collect();
        if queries.is_empty() {
            return Err(AppError::InvalidInput(
                "web_search needs at least one non-empty query".to_string(),
            ));
        }

        let output = self
            .pipeline
            .run_search(
                &queries,
                self.result_limit(args.max_results),
                args.topic.unwrap_or(self.defaults.topic),
            )
            .await?;

        Ok(Value::String(output))
    }
}
