use crate::search::{SearchProvider, SearchResponse, SearchTopic};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde_json::json;

pub const DEFAULT_TAVILY_BASE: &str = "https://api.tavily.com";

/// Tavily search API client.
pub struct TavilyClient {
    http_client: reqwest::Client,
    api_key: String,
    api_base: String,
}

impl TavilyClient {
    pub fn new(api_key: String, api_base: String) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SearchProvider for TavilyClient {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
        topic: SearchTopic,
        include_raw_content: bool,
    ) -> Result<SearchResponse> {
        let url = format!("{}/search", self.api_base);
        let body = json!({
            "query": query,
            "max_results": max_results,
            "topic": topic.as_str(),
            "include_raw_content": include_raw_content,
        });

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::SearchProvider(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::SearchProvider(format!(
                "Tavily request failed ({}): {}",
                status, text
            )));
        }

        let mut parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::SearchProvider(format!("Failed to parse response: {}", e)))?;

        if parsed.query.is_empty() {
            parsed.query = query.to_string();
        }
        tracing::debug!(query, results = parsed.results.len(), "Tavily search completed");

        Ok(parsed)
    }

    fn name(&self) -> &str {
        "tavily"
    }
}
