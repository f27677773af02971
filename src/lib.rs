//! # Strata - scoped multi-agent research
//!
//! Strata turns a research request into a cited markdown report in two
//! phases:
//!
//! 1. **Scope** - a clarification loop with the user ends in a research brief.
//! 2. **Execution** - a supervisor delegates topics to parallel researchers,
//!    each of which searches the web, reflects and compresses its findings.
//!    A writer then synthesizes the report from the brief and the notes.
//!
//! Strata can be used as the `strata` binary or as a library.
//!
//! ## Library Usage
//!
//! ```rust,ignore
//! use strata::research::{ConversationHistory, ResearchCoordinator};
//! use strata::utils::toml_config::StrataConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StrataConfig::load("strata.toml")?;
//!     let coordinator = ResearchCoordinator::from_config(&config)?;
//!
//!     let history = ConversationHistory::from_user("How do CRDTs handle deletes?");
//!     let scope = coordinator.run_scope_phase(&history).await?;
//!
//!     if let Some(brief) = scope.research_brief {
//!         let outcome = coordinator.run_execution_phase(&brief).await?;
//!         println!("{}", outcome.report);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`research`] - Scope, supervisor, researcher and report phases
//! - [`search`] - Search provider trait, Tavily client and result pipeline
//! - [`llm`] - LLM client trait, OpenAI and Ollama clients, structured output
//! - [`tools`] - Researcher tools (`web_search`, `think_tool`) and registry
//! - [`utils`] - `strata.toml` configuration
//! - [`types`] - Shared message types and errors

#![cfg_attr(docsrs, feature(doc_cfg))]

/// Command-line interface.
pub mod cli;
/// LLM client implementations.
pub mod llm;
/// Research phases and their coordination.
pub mod research;
/// Web search providers and the search pipeline.
pub mod search;
/// Tools available to researchers.
pub mod tools;
/// Common types and error handling.
pub mod types;
/// Configuration.
pub mod utils;

pub use llm::{LLMClient, LLMResponse, Provider, ProviderRegistry};
pub use research::{ExecutionOutcome, ResearchCoordinator, ResearchServices, ResearchSettings};
pub use search::{SearchProvider, SearchResponse, SearchResult, SearchTopic};
pub use tools::{Tool, ToolRegistry};
pub use types::{AppError, ConversationMessage, Result};
pub use utils::toml_config::StrataConfig;
