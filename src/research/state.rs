//! State carried through the research phases.

use crate::types::{ConversationMessage, MessageRole};
use serde::{Deserialize, Serialize};

/// Append-only conversation between the user and the scoping agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationHistory {
    messages: Vec<ConversationMessage>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a history from the user's first request.
    pub fn from_user(request: impl Into<String>) -> Self {
        let mut history = Self::new();
        history.push(ConversationMessage::user(request));
        history
    }

    pub fn push(&mut self, message: ConversationMessage) {
        self.messages.push(message);
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(ConversationMessage::user(content));
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Render as `Human: …` / `AI: …` lines for single-prompt calls.
    pub fn to_buffer_string(&self) -> String {
        self.messages
            .iter()
            .map(|m| {
                let prefix = match m.role {
                    MessageRole::User => "Human",
                    MessageRole::Assistant => "AI",
                    MessageRole::System => "System",
                    MessageRole::Tool => "Tool",
                };
                format!("{}: {}", prefix, m.content)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl From<Vec<ConversationMessage>> for ConversationHistory {
    fn from(messages: Vec<ConversationMessage>) -> Self {
        Self { messages }
    }
}

/// Compressed findings gathered from researchers. Only ever grows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Notes(Vec<String>);

impl Notes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, note: impl Into<String>) {
        self.0.push(note.into());
    }

    /// Append every note of `other`, keeping its order.
    pub fn merge(&mut self, other: Notes) {
        self.0.extend(other.0);
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Newline-joined, in append order.
    pub fn joined(&self) -> String {
        self.0.join("\n")
    }
}

/// Why a research loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// The researcher answered without requesting tools.
    Stop,
    /// The supervisor called `research_complete`.
    ResearchComplete,
    /// The supervisor's turn contained no delegation.
    NoDelegation,
    /// The iteration cap was reached.
    MaxIterations,
}

/// Working state of the supervisor loop.
#[derive(Debug, Clone, Default)]
pub struct SupervisorState {
    pub messages: Vec<ConversationMessage>,
    pub research_brief: String,
    pub notes: Notes,
    pub iterations: usize,
    /// Delegations dispatched so far across all turns.
    pub research_units: usize,
    pub topics: Vec<String>,
}

impl SupervisorState {
    pub fn new(research_brief: impl Into<String>) -> Self {
        let research_brief = research_brief.into();
        Self {
            messages: vec![ConversationMessage::user(research_brief.clone())],
            research_brief,
            ..Default::default()
        }
    }
}

/// Working state of one researcher. Never shared outside its loop.
#[derive(Debug, Clone, Default)]
pub struct ResearcherState {
    pub messages: Vec<ConversationMessage>,
    pub tool_call_iterations: usize,
    pub research_topic: String,
    pub compressed_research: String,
}

impl ResearcherState {
    pub fn new(research_topic: impl Into<String>) -> Self {
        let research_topic = research_topic.into();
        Self {
            messages: vec![ConversationMessage::user(research_topic.clone())],
            research_topic,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_string() {
        let mut history = ConversationHistory::from_user("Tell me about Rust");
        history.push(ConversationMessage::assistant("Which aspect?", vec![]));
        history.push_user("Async runtimes");

        assert_eq!(
            history.to_buffer_string(),
            "Human: Tell me about Rust\nAI: Which aspect?\nHuman: Async runtimes"
        );
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_notes_only_grow() {
        let mut notes = Notes::new();
        notes.push("first");
        let mut other = Notes::new();
        other.push("second");
        other.push("third");
        notes.merge(other);

        assert_eq!(notes.len(), 3);
        assert_eq!(notes.joined(), "first\nsecond\nthird");
    }

    #[test]
    fn test_states_seed_messages() {
        let supervisor = SupervisorState::new("brief");
        assert_eq!(supervisor.messages.len(), 1);
        assert_eq!(supervisor.iterations, 0);

        let researcher = ResearcherState::new("topic");
        assert_eq!(researcher.messages[0].content, "topic");
        assert_eq!(researcher.tool_call_iterations, 0);
    }
}
