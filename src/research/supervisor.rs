//! Supervisor delegation loop
//!
//! Each turn the supervisor model either delegates topics with
//! `conduct_research`, or ends the run with `research_complete`. Delegations of
//! one turn run concurrently on a [`JoinSet`]; their compressed findings are
//! appended to the notes as they finish.

use crate::llm::client::LLMClient;
use crate::research::prompts;
use crate::research::researcher::ResearchAgent;
use crate::research::schema::{parameters_for, ConductResearch, ResearchComplete};
use crate::research::state::{FinishReason, Notes, SupervisorState};
use crate::types::{ConversationMessage, Result, ToolCall, ToolDefinition};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

pub const CONDUCT_RESEARCH: &str = "conduct_research";
pub const RESEARCH_COMPLETE: &str = "research_complete";

/// Loop bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupervisorSettings {
    pub max_iterations: usize,
    /// Researchers dispatched per turn.
    pub max_concurrent_research_units: usize,
    /// Researchers dispatched over the whole run.
    pub max_total_research_units: Option<usize>,
}

impl Default for SupervisorSettings {
    fn default() -> Self {
        Self {
            max_iterations: 6,
            max_concurrent_research_units: 3,
            max_total_research_units: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SupervisorOutcome {
    pub notes: Notes,
    pub iterations: usize,
    pub research_units: usize,
    /// Dispatched topics, in dispatch order.
    pub topics: Vec<String>,
    pub finish_reason: FinishReason,
    pub messages: Vec<ConversationMessage>,
}

pub struct Supervisor {
    client: Arc<dyn LLMClient>,
    researcher: ResearchAgent,
    settings: SupervisorSettings,
}

impl Supervisor {
    pub fn new(
        client: Arc<dyn LLMClient>,
        researcher: ResearchAgent,
        settings: SupervisorSettings,
    ) -> Self {
        Self {
            client,
            researcher,
            settings,
        }
    }

    /// Tools offered to the supervisor model.
    pub fn tool_definitions() -> Vec<ToolDefinition> {
        vec![
            ToolDefinition {
                name: CONDUCT_RESEARCH.to_string(),
                description: "Delegate research on one topic to a specialized sub-agent. \
                              Call several times in one turn to research topics in parallel."
                    .to_string(),
                parameters: parameters_for::<ConductResearch>(),
            },
            ToolDefinition {
                name: RESEARCH_COMPLETE.to_string(),
                description: "Call this tool to indicate that the research is complete."
                    .to_string(),
                parameters: parameters_for::<ResearchComplete>(),
            },
        ]
    }

    /// Drive the loop for `research_brief`.
    ///
    /// Only the supervisor's own inference failures are returned as errors;
    /// failed researchers are left out of the notes.
    pub async fn run(&self, research_brief: &str) -> Result<SupervisorOutcome> {
        let mut state = SupervisorState::new(research_brief);
        let system = ConversationMessage::system(prompts::lead_researcher_prompt(
            &prompts::today(),
            self.settings.max_concurrent_research_units,
            self.settings.max_iterations,
        ));
        let tools = Self::tool_definitions();

        let finish_reason = loop {
            if state.iterations >= self.settings.max_iterations {
                info!("Supervisor reached {} iterations", self.settings.max_iterations);
                break FinishReason::MaxIterations;
            }
            info!(
                "Supervisor iteration {}/{}",
                state.iterations + 1,
                self.settings.max_iterations
            );

            let mut request = Vec::with_capacity(state.messages.len() + 1);
            request.push(system.clone());
            request.extend(state.messages.iter().cloned());

            let response = self.client.generate_with_tools(&request, &tools).await?;
            let calls = response.tool_calls.clone();
            state
                .messages
                .push(ConversationMessage::assistant(response.content, response.tool_calls));

            if calls.iter().any(|c| c.name == RESEARCH_COMPLETE) {
                for call in &calls {
                    let text = if call.name == RESEARCH_COMPLETE {
                        "Research marked complete."
                    } else {
                        "Not dispatched: research was marked complete in the same turn."
                    };
                    state.messages.push(ConversationMessage::tool_result(call, text));
                }
                break FinishReason::ResearchComplete;
            }

            if !calls.iter().any(|c| c.name == CONDUCT_RESEARCH) {
                for call in &calls {
                    state
                        .messages
                        .push(ConversationMessage::tool_result(call, unknown_tool(call)));
                }
                break FinishReason::NoDelegation;
            }

            let remaining_total = self
                .settings
                .max_total_research_units
                .map(|max| max.saturating_sub(state.research_units));
            if remaining_total == Some(0) {
                for call in &calls {
                    state.messages.push(ConversationMessage::tool_result(
                        call,
                        "Not dispatched: the research budget for this run is spent.",
                    ));
                }
                break FinishReason::MaxIterations;
            }

            let allowed = remaining_total
                .unwrap_or(usize::MAX)
                .min(self.settings.max_concurrent_research_units);
            self.dispatch(&mut state, &calls, allowed).await;
            state.iterations += 1;
        };

        Ok(SupervisorOutcome {
            notes: state.notes,
            iterations: state.iterations,
            research_units: state.research_units,
            topics: state.topics,
            finish_reason,
            messages: state.messages,
        })
    }

    /// Run up to `allowed` delegations of one turn concurrently and answer every
    /// call of the turn with a tool result.
    async fn dispatch(&self, state: &mut SupervisorState, calls: &[ToolCall], allowed: usize) {
        let mut replies: HashMap<String, String> = HashMap::new();
        let mut tasks = JoinSet::new();
        let mut dispatched = 0;

        for call in calls {
            if call.name != CONDUCT_RESEARCH {
                replies.insert(call.id.clone(), unknown_tool(call));
                continue;
            }

            let args: ConductResearch = match serde_json::from_value(call.arguments.clone()) {
                Ok(args) => args,
                Err(e) => {
                    replies.insert(
                        call.id.clone(),
                        format!("Error: invalid conduct_research arguments: {}", e),
                    );
                    continue;
                }
            };

            if dispatched >= allowed {
                replies.insert(
                    call.id.clone(),
                    format!(
                        "Not dispatched: at most {} research units may run per turn.",
                        allowed
                    ),
                );
                continue;
            }

            state.topics.push(args.research_topic.clone());
            let agent = self.researcher.clone();
            let call_id = call.id.clone();
            tasks.spawn(async move { (call_id, agent.research(&args.research_topic).await) });
            dispatched += 1;
        }

        state.research_units += dispatched;
        info!("Dispatched {} researchers", dispatched);

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((call_id, Ok(outcome))) => {
                    debug!(topic = %outcome.research_topic, "Researcher finished");
                    replies.insert(call_id, outcome.compressed_research.clone());
                    state.notes.push(outcome.compressed_research);
                }
                Ok((call_id, Err(e))) => {
                    warn!("Researcher failed, dropping its findings: {}", e);
                    replies.insert(call_id, format!("Error: research failed: {}", e));
                }
                Err(join_error) => {
                    warn!("Researcher task aborted: {}", join_error);
                }
            }
        }

        for call in calls {
            let reply = replies
                .remove(&call.id)
                .unwrap_or_else(|| "Error: research task aborted.".to_string());
            state.messages.push(ConversationMessage::tool_result(call, reply));
        }
    }
}

fn unknown_tool(call: &ToolCall) -> String {
    format!("Error: unknown tool '{}'", call.name)
}
