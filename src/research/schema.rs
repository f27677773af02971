//! Structured shapes exchanged with the inference service.
//!
//! Every type derives `JsonSchema` so the same definition drives the schema sent
//! to the model and the validation of its reply.

use crate::search::SearchTopic;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Decision taken by the clarify node for one user turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClarifyWithUser {
    /// Whether the user needs to be asked a clarifying question.
    pub need_clarification: bool,
    /// A question to ask the user to clarify the report scope.
    #[serde(default)]
    pub question: String,
    /// Message confirming research will start with the information provided.
    #[serde(default)]
    pub verification: String,
}

/// Research brief distilled from the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResearchQuestion {
    /// A research question that will be used to guide the research.
    pub research_brief: String,
}

/// Summary of one web page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Summary {
    pub summary: String,
    /// Verbatim quotes worth keeping from the page.
    pub key_excerpts: String,
}

impl Summary {
    pub fn render(&self) -> String {
        format!(
            "<summary>\n{}\n</summary>\n\n<key_excerpts>\n{}\n</key_excerpts>",
            self.summary, self.key_excerpts
        )
    }
}

/// Arguments of the supervisor's `conduct_research` tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConductResearch {
    /// The topic to research. Should be a single topic, described in high
    /// detail (at least a paragraph).
    pub research_topic: String,
}

/// Arguments of the supervisor's `research_complete` tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResearchComplete {}

/// Arguments of the researcher's `web_search` tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WebSearchArgs {
    /// Search queries to execute.
    pub queries: Vec<String>,
    /// Maximum number of results per query.
    #[serde(default)]
    pub max_results: Option<usize>,
    /// Topic filter: general, news or finance.
    #[serde(default)]
    pub topic: Option<SearchTopic>,
}

/// Arguments of the researcher's `think_tool`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ThinkArgs {
    /// Reflection on research progress, findings, gaps and next steps.
    pub reflection: String,
}

/// JSON schema of `T` for use as tool parameters.
pub fn parameters_for<T: JsonSchema>() -> serde_json::Value {
    serde_json::to_value(schemars::schema_for!(T)).unwrap_or_else(|_| {
        serde_json::json!({"type": "object", "properties": {}})
    })
}
