//! Multi-Agent Research Coordination
//!
//! Research runs in two phases:
//!
//! 1. **Scope** - [`scope::ScopeAgent`] decides per user turn whether to ask a
//!    clarifying question or write the research brief.
//! 2. **Execution** - [`supervisor::Supervisor`] delegates topics to parallel
//!    [`researcher::ResearchAgent`]s, collects their compressed findings, and
//!    [`writer::ReportWriter`] turns brief and notes into the final report.
//!
//! [`coordinator::ResearchCoordinator`] wires both phases from `strata.toml`.
//!
//! # Usage
//!
//! ```ignore
//! use strata::research::{ConversationHistory, ResearchCoordinator};
//!
//! let coordinator = ResearchCoordinator::from_config(&config)?;
//! let scope = coordinator
//!     .run_scope_phase(&ConversationHistory::from_user("Compare Rust async runtimes"))
//!     .await?;
//!
//! if let Some(brief) = scope.research_brief {
//!     let outcome = coordinator.run_execution_phase(&brief).await?;
//!     println!("{}", outcome.report);
//! }
//! ```

/// Research phase coordination.
pub mod coordinator;
/// Prompt templates.
pub mod prompts;
/// Researcher sub-agent loop.
pub mod researcher;
/// Structured-output and tool-argument shapes.
pub mod schema;
/// Scope clarification state machine.
pub mod scope;
/// Conversation, notes and loop state.
pub mod state;
/// Supervisor delegation loop.
pub mod supervisor;
/// Report synthesis and persistence.
pub mod writer;

pub use coordinator::{ExecutionOutcome, ResearchCoordinator, ResearchServices, ResearchSettings};
pub use scope::ScopeResult;
pub use state::{ConversationHistory, FinishReason, Notes};
pub use writer::{FileReportStore, ReportStore};
