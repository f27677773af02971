//! Tools available to the researcher
//!
//! - [`search`](crate::tools::search) - `web_search`, backed by the search pipeline
//! - [`think`](crate::tools::think) - `think_tool`, records a reflection verbatim
//! - [`registry`](crate::tools::registry) - tool registration and dispatch
//!
//! ```ignore
//! let registry = ToolRegistry::for_researcher(pipeline, SearchDefaults::default());
//! let definitions = registry.get_tool_definitions();
//! let result = registry.execute("think_tool", json!({"reflection": "..."})).await?;
//! ```

/// Tool registry for managing available tools.
pub mod registry;
/// Web search tool over the search pipeline.
pub mod search;
/// Reflection tool.
pub mod think;

pub use registry::{Tool, ToolRegistry};
pub use search::{SearchDefaults, WebSearchTool};
pub use think::ThinkTool;
