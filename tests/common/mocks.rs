//! Mock implementations for testing.
//!
//! Test doubles for the inference service, the search provider and the report
//! store, shared across the integration test files.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use strata::llm::client::StructuredSchema;
use strata::llm::{LLMClient, LLMResponse};
use strata::research::ReportStore;
use strata::search::{SearchProvider, SearchResponse, SearchResult, SearchTopic};
use strata::types::{AppError, ConversationMessage, MessageRole, Result, ToolCall, ToolDefinition};

/// One scripted reply to a tool-calling request.
#[derive(Debug, Clone)]
pub enum Turn {
    Reply(LLMResponse),
    Fail(String),
}

/// LLM client that replays queued answers in order.
///
/// Tool-calling turns, structured replies (keyed by schema name) and plain
/// text replies each have their own queue. Every request is recorded.
#[derive(Default)]
pub struct ScriptedLLMClient {
    turns: Mutex<VecDeque<Turn>>,
    structured: Mutex<HashMap<String, VecDeque<Value>>>,
    texts: Mutex<VecDeque<String>>,
    tool_requests: Mutex<Vec<Vec<ConversationMessage>>>,
    structured_requests: Mutex<Vec<String>>,
    fail_all: bool,
}

impl ScriptedLLMClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// A client whose every call fails.
    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    pub fn with_turn(self, response: LLMResponse) -> Self {
        self.turns.lock().push_back(Turn::Reply(response));
        self
    }

    pub fn with_failed_turn(self, message: &str) -> Self {
        self.turns.lock().push_back(Turn::Fail(message.to_string()));
        self
    }

    pub fn with_structured(self, schema_name: &str, value: Value) -> Self {
        self.structured
            .lock()
            .entry(schema_name.to_string())
            .or_default()
            .push_back(value);
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.texts.lock().push_back(text.to_string());
        self
    }

    /// Messages sent with each tool-calling request, in call order.
    pub fn tool_requests(&self) -> Vec<Vec<ConversationMessage>> {
        self.tool_requests.lock().clone()
    }

    /// Schema names requested, in call order.
    pub fn structured_requests(&self) -> Vec<String> {
        self.structured_requests.lock().clone()
    }

    pub fn remaining_turns(&self) -> usize {
        self.turns.lock().len()
    }
}

#[async_trait]
impl LLMClient for ScriptedLLMClient {
    async fn generate_with_history(&self, _messages: &[ConversationMessage]) -> Result<String> {
        if self.fail_all {
            return Err(AppError::LLM("Mock LLM failure".to_string()));
        }
        self.texts
            .lock()
            .pop_front()
            .ok_or_else(|| AppError::LLM("No scripted text reply left".to_string()))
    }

    async fn generate_with_tools(
        &self,
        messages: &[ConversationMessage],
        _tools: &[ToolDefinition],
    ) -> Result<LLMResponse> {
        self.tool_requests.lock().push(messages.to_vec());
        if self.fail_all {
            return Err(AppError::LLM("Mock LLM failure".to_string()));
        }
        match self.turns.lock().pop_front() {
            Some(Turn::Reply(response)) => Ok(response),
            Some(Turn::Fail(message)) => Err(AppError::LLM(message)),
            None => Ok(LLMResponse::text("Nothing left to do.")),
        }
    }

    async fn generate_structured(
        &self,
        _messages: &[ConversationMessage],
        schema: &StructuredSchema,
    ) -> Result<Value> {
        self.structured_requests.lock().push(schema.name.clone());
        if self.fail_all {
            return Err(AppError::LLM("Mock LLM failure".to_string()));
        }
        self.structured
            .lock()
            .get_mut(&schema.name)
            .and_then(|queue| queue.pop_front())
            .ok_or_else(|| {
                AppError::LLM(format!("No scripted reply for schema '{}'", schema.name))
            })
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Researcher and compressor double whose answers depend only on the topic.
///
/// The topic is the first user message of the request. Topics can be given a
/// delay or made to fail. Peak concurrency is tracked.
#[derive(Default)]
pub struct TopicLLMClient {
    delays: HashMap<String, Duration>,
    failures: HashSet<String>,
    search_first: bool,
    active: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
}

impl TopicLLMClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, topic: &str, millis: u64) -> Self {
        self.delays
            .insert(topic.to_string(), Duration::from_millis(millis));
        self
    }

    pub fn with_failure(mut self, topic: &str) -> Self {
        self.failures.insert(topic.to_string());
        self
    }

    /// Make the first turn of every researcher a `web_search` on its topic.
    pub fn searching(mut self) -> Self {
        self.search_first = true;
        self
    }

    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn findings_for(topic: &str) -> String {
        format!("Compressed findings on {}", topic)
    }
}

fn first_user_message(messages: &[ConversationMessage]) -> String {
    messages
        .iter()
        .find(|m| m.role == MessageRole::User)
        .map(|m| m.content.clone())
        .unwrap_or_default()
}

#[async_trait]
impl LLMClient for TopicLLMClient {
    async fn generate_with_history(&self, messages: &[ConversationMessage]) -> Result<String> {
        Ok(Self::findings_for(&first_user_message(messages)))
    }

    async fn generate_with_tools(
        &self,
        messages: &[ConversationMessage],
        _tools: &[ToolDefinition],
    ) -> Result<LLMResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let topic = first_user_message(messages);

        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(&topic) {
            tokio::time::sleep(*delay).await;
        }
        self.active.fetch_sub(1, Ordering::SeqCst);

        if self.failures.contains(&topic) {
            return Err(AppError::LLM(format!("researcher for '{}' failed", topic)));
        }

        let searched = messages.iter().any(|m| m.role == MessageRole::Tool);
        if self.search_first && !searched {
            return Ok(LLMResponse::with_tool_calls(
                "",
                vec![ToolCall::new("web_search", json!({ "queries": [topic] }))],
            ));
        }
        Ok(LLMResponse::text(format!("Raw notes on {}", topic)))
    }

    async fn generate_structured(
        &self,
        _messages: &[ConversationMessage],
        schema: &StructuredSchema,
    ) -> Result<Value> {
        Err(AppError::LLM(format!(
            "TopicLLMClient has no structured reply for '{}'",
            schema.name
        )))
    }

    fn model_name(&self) -> &str {
        "topic"
    }
}

/// Search provider answering from a fixed table of query → results.
#[derive(Default)]
pub struct MockSearchProvider {
    results: HashMap<String, Vec<SearchResult>>,
    fail: bool,
    queries: Mutex<Vec<(String, usize, SearchTopic, bool)>>,
}

impl MockSearchProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with_results(mut self, query: &str, results: Vec<SearchResult>) -> Self {
        self.results.insert(query.to_string(), results);
        self
    }

    /// `(query, max_results, topic, include_raw_content)` of every call.
    pub fn queries(&self) -> Vec<(String, usize, SearchTopic, bool)> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl SearchProvider for MockSearchProvider {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
        topic: SearchTopic,
        include_raw_content: bool,
    ) -> Result<SearchResponse> {
        self.queries.lock().push((
            query.to_string(),
            max_results,
            topic,
            include_raw_content,
        ));
        if self.fail {
            return Err(AppError::SearchProvider("quota exceeded".to_string()));
        }
        Ok(SearchResponse {
            query: query.to_string(),
            results: self.results.get(query).cloned().unwrap_or_default(),
        })
    }

    fn name(&self) -> &str {
        "mock"
    }
}

pub fn search_hit(url: &str, title: &str, raw_content: Option<&str>) -> SearchResult {
    SearchResult {
        url: url.to_string(),
        title: title.to_string(),
        content: format!("snippet: {}", title),
        raw_content: raw_content.map(str::to_string),
    }
}

/// Report store that keeps reports in memory.
#[derive(Default)]
pub struct MemoryReportStore {
    reports: Mutex<Vec<String>>,
    fail: bool,
}

impl MemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn reports(&self) -> Vec<String> {
        self.reports.lock().clone()
    }
}

#[async_trait]
impl ReportStore for MemoryReportStore {
    async fn store(&self, report: &str) -> Result<String> {
        if self.fail {
            return Err(AppError::Persistence("disk full".to_string()));
        }
        self.reports.lock().push(report.to_string());
        Ok("memory://report".to_string())
    }
}

/// `conduct_research` call for `topic`.
pub fn delegate(topic: &str) -> ToolCall {
    ToolCall::new("conduct_research", json!({ "research_topic": topic }))
}

pub fn complete() -> ToolCall {
    ToolCall::new("research_complete", json!({}))
}
