//! Search result processing
//!
//! One pass turns a batch of queries into a single block of text for the
//! researcher: query the provider, drop duplicate URLs (first seen wins),
//! summarize pages that came back with raw content, and format each source.

use crate::llm::client::LLMClient;
use crate::llm::structured::invoke_structured;
use crate::research::prompts;
use crate::research::schema::Summary;
use crate::search::{SearchProvider, SearchResult, SearchTopic};
use crate::types::{ConversationMessage, Result};
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Returned when no query produced a usable result.
pub const NO_RESULTS_SENTINEL: &str =
    "No valid search results found. Please try different search queries or use a different search API.";

const CHARS_PER_TOKEN: usize = 4;
const ELLIPSIS: &str = "...";

/// Tunables for [`SearchPipeline`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineSettings {
    /// Token budget for page text handed to the summarizer.
    pub summary_max_tokens: usize,
    /// Characters of raw page text kept when summarization fails.
    pub fallback_chars: usize,
    pub include_raw_content: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            summary_max_tokens: 100_000,
            fallback_chars: 1000,
            include_raw_content: true,
        }
    }
}

/// A deduplicated result after summarization.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedSource {
    pub url: String,
    pub title: String,
    pub content: String,
}

pub struct SearchPipeline {
    provider: Arc<dyn SearchProvider>,
    summarizer: Arc<dyn LLMClient>,
    settings: PipelineSettings,
}

impl SearchPipeline {
    pub fn new(
        provider: Arc<dyn SearchProvider>,
        summarizer: Arc<dyn LLMClient>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            provider,
            summarizer,
            settings,
        }
    }

    /// Search every query and return the formatted sources.
    ///
    /// A provider failure on any query fails the whole call. Summarization
    /// failures never do.
    pub async fn run_search(
        &self,
        queries: &[String],
        max_results: usize,
        topic: SearchTopic,
    ) -> Result<String> {
        let responses = join_all(queries.iter().map(|query| {
            self.provider
                .search(query, max_results, topic, self.settings.include_raw_content)
        }))
        .await;

        let mut hits = Vec::new();
        for response in responses {
            hits.extend(response?.results);
        }

        let unique = deduplicate_search_results(hits);
        debug!(
            queries = queries.len(),
            unique = unique.len(),
            "Deduplicated search results"
        );

        let sources = join_all(unique.into_iter().map(|result| self.process_result(result))).await;

        Ok(format_search_output(&sources))
    }

    async fn process_result(&self, result: SearchResult) -> ProcessedSource {
        let content = match result.raw_content.as_deref() {
            Some(raw) if !raw.is_empty() => self.summarize_webpage_content(raw).await,
            _ => result.content,
        };

        ProcessedSource {
            url: result.url,
            title: result.title,
            content,
        }
    }

    /// Summarize page text, degrading to a prefix of the page on failure.
    pub async fn summarize_webpage_content(&self, webpage_content: &str) -> String {
        let truncated = truncate_content_by_tokens(webpage_content, self.settings.summary_max_tokens);
        let messages = [ConversationMessage::user(prompts::summarize_webpage_prompt(
            &truncated,
            &prompts::today(),
        ))];

        match invoke_structured::<Summary>(self.summarizer.as_ref(), &messages).await {
            Ok(summary) => summary.render(),
            Err(e) => {
                warn!("Failed to summarize webpage: {}", e);
                fallback_excerpt(webpage_content, self.settings.fallback_chars)
            }
        }
    }
}

/// Keep the first occurrence of every URL, preserving order.
pub fn deduplicate_search_results(
    results: impl IntoIterator<Item = SearchResult>,
) -> Vec<SearchResult> {
    let mut seen = HashSet::new();
    results
        .into_iter()
        .filter(|result| seen.insert(result.url.clone()))
        .collect()
}

/// Truncate `content` to at most `max_tokens * 4` characters.
///
/// Prefers ending on the last `. `, `! ` or `? ` when it falls strictly after
/// 80% of the window, otherwise cuts hard and appends `...` (counted in the
/// budget).
pub fn truncate_content_by_tokens(content: &str, max_tokens: usize) -> String {
    let max_chars = max_tokens.saturating_mul(CHARS_PER_TOKEN);

    let window_end = match content.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => byte_idx,
        None => return content.to_string(),
    };
    let window = &content[..window_end];
    if max_chars < ELLIPSIS.len() {
        return window.to_string();
    }

    let last_sentence_end = [". ", "! ", "? "]
        .iter()
        .filter_map(|marker| window.rfind(marker))
        .max();

    if let Some(byte_pos) = last_sentence_end {
        let char_pos = window[..byte_pos].chars().count();
        if char_pos * 5 > max_chars * 4 {
            // Keep the punctuation mark, drop the space.
            return window[..byte_pos + 1].to_string();
        }
    }

    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut truncated: String = window.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

fn fallback_excerpt(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{}", &content[..byte_idx], ELLIPSIS),
        None => content.to_string(),
    }
}

/// Render sources for the researcher, or the no-results sentinel.
pub fn format_search_output(sources: &[ProcessedSource]) -> String {
    if sources.is_empty() {
        return NO_RESULTS_SENTINEL.to_string();
    }

    let mut output = String::from("Search results: \n\n");
    for (i, source) in sources.iter().enumerate() {
        output.push_str(&format!("\n\n--- SOURCE {}: {} ---\n", i + 1, source.title));
        output.push_str(&format!("URL: {}\n\n", source.url));
        output.push_str(&format!("SUMMARY:\n{}\n\n", source.content));
        output.push_str(&"-".repeat(80));
        output.push('\n');
    }
    output
}
