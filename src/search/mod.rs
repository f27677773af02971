//! Web search providers and the result-processing pipeline
//!
//! - [`SearchProvider`] - trait every search backend implements
//! - [`tavily`](crate::search::tavily) - Tavily `/search` client
//! - [`pipeline`](crate::search::pipeline) - dedupe, truncate, summarize and format
//!
//! The research loops only see the formatted text produced by
//! [`SearchPipeline::run_search`](crate::search::pipeline::SearchPipeline::run_search).

pub mod pipeline;
pub mod tavily;

pub use pipeline::{PipelineSettings, SearchPipeline, NO_RESULTS_SENTINEL};
pub use tavily::TavilyClient;

use crate::types::Result;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Search category understood by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SearchTopic {
    #[default]
    General,
    News,
    Finance,
}

impl SearchTopic {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchTopic::General => "general",
            SearchTopic::News => "news",
            SearchTopic::Finance => "finance",
        }
    }
}

/// A single ranked hit. `url` is the identity used for deduplication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub url: String,
    pub title: String,
    /// Short snippet chosen by the provider.
    #[serde(default)]
    pub content: String,
    /// Full page text, when requested and available.
    #[serde(default)]
    pub raw_content: Option<String>,
}

/// Results for one query, in provider rank order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run one query. Failures are reported as `AppError::SearchProvider`.
    async fn search(
        &self,
        query: &str,
        max_results: usize,
        topic: SearchTopic,
        include_raw_content: bool,
    ) -> Result<SearchResponse>;

    fn name(&self) -> &str;
}
