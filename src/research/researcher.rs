//! Researcher sub-agent
//!
//! Runs a bounded tool-calling loop on one topic, then compresses everything it
//! gathered into a single block of findings for the supervisor.

use crate::llm::client::LLMClient;
use crate::research::prompts;
use crate::research::state::{FinishReason, ResearcherState};
use crate::tools::ToolRegistry;
use crate::types::{AppError, ConversationMessage, MessageRole, Result, ToolCall};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Tool result for calls requested on the turn that used up the budget.
const BUDGET_EXHAUSTED: &str = "Not executed: research budget exhausted";

/// Result of one researcher run. The only thing that leaves the loop.
#[derive(Debug, Clone)]
pub struct ResearcherOutcome {
    pub research_topic: String,
    /// Never empty.
    pub compressed_research: String,
    /// Tool results and assistant text, in the order they were produced.
    pub raw_notes: Vec<String>,
    pub messages: Vec<ConversationMessage>,
    pub tool_call_iterations: usize,
    pub finish_reason: FinishReason,
}

/// Cheap to clone; every sub-agent gets its own copy.
#[derive(Clone)]
pub struct ResearchAgent {
    client: Arc<dyn LLMClient>,
    compressor: Arc<dyn LLMClient>,
    tools: Arc<ToolRegistry>,
    max_iterations: usize,
}

impl ResearchAgent {
    pub fn new(
        client: Arc<dyn LLMClient>,
        compressor: Arc<dyn LLMClient>,
        tools: Arc<ToolRegistry>,
        max_iterations: usize,
    ) -> Self {
        Self {
            client,
            compressor,
            tools,
            max_iterations,
        }
    }

    /// Research `topic` until the model stops calling tools or the cap is hit.
    pub async fn research(&self, topic: &str) -> Result<ResearcherOutcome> {
        let mut state = ResearcherState::new(topic);
        let system = ConversationMessage::system(prompts::research_agent_prompt(&prompts::today()));
        let definitions = self.tools.get_tool_definitions();

        let finish_reason = loop {
            if state.tool_call_iterations >= self.max_iterations {
                info!(
                    topic,
                    "Researcher reached {} tool-call iterations, compressing", self.max_iterations
                );
                break FinishReason::MaxIterations;
            }

            let mut request = Vec::with_capacity(state.messages.len() + 1);
            request.push(system.clone());
            request.extend(state.messages.iter().cloned());

            let response = self.client.generate_with_tools(&request, &definitions).await?;
            state.tool_call_iterations += 1;

            let calls = response.tool_calls.clone();
            state
                .messages
                .push(ConversationMessage::assistant(response.content, response.tool_calls));

            if calls.is_empty() {
                break FinishReason::Stop;
            }

            if state.tool_call_iterations >= self.max_iterations {
                info!(
                    topic,
                    calls = calls.len(),
                    "Researcher budget exhausted, skipping requested tool calls"
                );
                for call in &calls {
                    state
                        .messages
                        .push(ConversationMessage::tool_result(call, BUDGET_EXHAUSTED));
                }
                break FinishReason::MaxIterations;
            }

            debug!(
                topic,
                iteration = state.tool_call_iterations,
                calls = calls.len(),
                "Executing researcher tool calls"
            );
            for call in &calls {
                let output = self.execute_tool(call).await?;
                state
                    .messages
                    .push(ConversationMessage::tool_result(call, output));
            }
        };

        let raw_notes = collect_raw_notes(&state.messages);
        state.compressed_research = self.compress(&state, &raw_notes).await;

        Ok(ResearcherOutcome {
            research_topic: state.research_topic,
            compressed_research: state.compressed_research,
            raw_notes,
            messages: state.messages,
            tool_call_iterations: state.tool_call_iterations,
            finish_reason,
        })
    }

    /// Run one tool call. Mistakes the model can fix come back as text; search
    /// provider failures end the researcher.
    async fn execute_tool(&self, call: &ToolCall) -> Result<String> {
        match self.tools.execute(&call.name, call.arguments.clone()).await {
            Ok(Value::String(text)) => Ok(text),
            Ok(other) => Ok(other.to_string()),
            Err(e @ AppError::SearchProvider(_)) => Err(e),
            Err(e) => {
                warn!(tool = %call.name, "Tool call rejected: {}", e);
                Ok(format!("Error: {}", e))
            }
        }
    }

    async fn compress(&self, state: &ResearcherState, raw_notes: &[String]) -> String {
        let mut request = Vec::with_capacity(state.messages.len() + 2);
        request.push(ConversationMessage::system(
            prompts::compress_research_system_prompt(&prompts::today()),
        ));
        request.extend(state.messages.iter().cloned());
        request.push(ConversationMessage::user(
            prompts::compress_research_human_message(&state.research_topic),
        ));

        let compressed = match self.compressor.generate_with_history(&request).await {
            Ok(text) => text,
            Err(e) => {
                warn!(topic = %state.research_topic, "Compression failed, keeping raw notes: {}", e);
                String::new()
            }
        };

        non_empty_findings(compressed, raw_notes, &state.research_topic)
    }
}

fn collect_raw_notes(messages: &[ConversationMessage]) -> Vec<String> {
    messages
        .iter()
        .filter(|m| matches!(m.role, MessageRole::Tool | MessageRole::Assistant))
        .map(|m| m.content.trim())
        .filter(|content| !content.is_empty() && *content != BUDGET_EXHAUSTED)
        .map(str::to_string)
        .collect()
}

/// Compressed text, else the raw notes, else a fixed line naming the topic.
fn non_empty_findings(compressed: String, raw_notes: &[String], topic: &str) -> String {
    if !compressed.trim().is_empty() {
        return compressed;
    }
    let joined = raw_notes.join("\n");
    if !joined.trim().is_empty() {
        return joined;
    }
    format!("No findings for {}", topic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_findings_fallback_chain() {
        assert_eq!(non_empty_findings("done".into(), &[], "t"), "done");
        assert_eq!(
            non_empty_findings("  ".into(), &["a".into(), "b".into()], "t"),
            "a\nb"
        );
        assert_eq!(non_empty_findings(String::new(), &[], "rust"), "No findings for rust");
    }

    #[test]
    fn test_raw_notes_skip_user_and_blank() {
        let call = ToolCall::new("think_tool", serde_json::json!({"reflection": "r"}));
        let messages = vec![
            ConversationMessage::user("topic"),
            ConversationMessage::assistant("", vec![call.clone()]),
            ConversationMessage::tool_result(&call, "Reflection recorded: r"),
            ConversationMessage::assistant("Final answer", vec![]),
        ];
        assert_eq!(
            collect_raw_notes(&messages),
            vec!["Reflection recorded: r".to_string(), "Final answer".to_string()]
        );
    }
}
