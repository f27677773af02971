//! Scope clarification
//!
//! A small state machine run once per user turn:
//!
//! ```text
//! START -> Clarify -> End                  (question for the user)
//!                  -> WriteBrief -> End    (research brief)
//! ```
//!
//! With clarification disabled the machine starts at `WriteBrief`.

use crate::llm::client::LLMClient;
use crate::llm::structured::invoke_structured;
use crate::research::prompts;
use crate::research::schema::{ClarifyWithUser, ResearchQuestion};
use crate::research::state::ConversationHistory;
use crate::types::{AppError, ConversationMessage, Result};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeNode {
    Clarify,
    WriteBrief,
    End,
}

/// Outcome of one scoping turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeResult {
    /// `true` once a brief has been written.
    pub done: bool,
    /// Follow-up question for the user, when more input is needed.
    pub question: Option<String>,
    /// Acknowledgement sent before the brief is written.
    pub verification: Option<String>,
    pub research_brief: Option<String>,
    /// Input history plus the assistant messages added this turn.
    pub messages: ConversationHistory,
}

pub struct ScopeAgent {
    client: Arc<dyn LLMClient>,
    allow_clarification: bool,
}

impl ScopeAgent {
    pub fn new(client: Arc<dyn LLMClient>, allow_clarification: bool) -> Self {
        Self {
            client,
            allow_clarification,
        }
    }

    /// Run one turn over `history`. Inference failures surface unchanged.
    pub async fn run(&self, history: &ConversationHistory) -> Result<ScopeResult> {
        if history.is_empty() {
            return Err(AppError::InvalidInput(
                "Cannot scope research from an empty conversation".to_string(),
            ));
        }

        let mut messages = history.clone();
        let mut question = None;
        let mut verification = None;
        let mut research_brief = None;

        let mut node = if self.allow_clarification {
            ScopeNode::Clarify
        } else {
            ScopeNode::WriteBrief
        };

        loop {
            debug!(?node, "Scope node");
            node = match node {
                ScopeNode::Clarify => {
                    let decision = self.clarify(&messages).await?;
                    if decision.need_clarification {
                        messages.push(ConversationMessage::assistant(
                            decision.question.clone(),
                            vec![],
                        ));
                        question = Some(decision.question);
                        ScopeNode::End
                    } else {
                        messages.push(ConversationMessage::assistant(
                            decision.verification.clone(),
                            vec![],
                        ));
                        verification = Some(decision.verification);
                        ScopeNode::WriteBrief
                    }
                }
                ScopeNode::WriteBrief => {
                    research_brief = Some(self.write_brief(&messages).await?);
                    ScopeNode::End
                }
                ScopeNode::End => break,
            };
        }

        let done = research_brief.is_some();
        if done {
            info!("Research brief written");
        } else {
            info!("Asking the user for clarification");
        }

        Ok(ScopeResult {
            done,
            question,
            verification,
            research_brief,
            messages,
        })
    }

    async fn clarify(&self, history: &ConversationHistory) -> Result<ClarifyWithUser> {
        let prompt =
            prompts::clarify_with_user_prompt(&history.to_buffer_string(), &prompts::today());
        let decision: ClarifyWithUser =
            invoke_structured(self.client.as_ref(), &[ConversationMessage::user(prompt)]).await?;

        let (field, text) = if decision.need_clarification {
            ("question", &decision.question)
        } else {
            ("verification", &decision.verification)
        };
        if text.trim().is_empty() {
            return Err(AppError::LLM(format!(
                "Model returned a clarification decision without a {}",
                field
            )));
        }
        Ok(decision)
    }

    async fn write_brief(&self, history: &ConversationHistory) -> Result<String> {
        let prompt = prompts::research_brief_prompt(&history.to_buffer_string(), &prompts::today());
        let question: ResearchQuestion =
            invoke_structured(self.client.as_ref(), &[ConversationMessage::user(prompt)]).await?;

        let brief = question.research_brief.trim();
        if brief.is_empty() {
            return Err(AppError::LLM("Model returned an empty research brief".to_string()));
        }
        Ok(brief.to_string())
    }
}
