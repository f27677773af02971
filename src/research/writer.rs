//! Final report synthesis and persistence.

use crate::llm::client::LLMClient;
use crate::research::prompts;
use crate::research::state::Notes;
use crate::types::{AppError, ConversationMessage, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const DEFAULT_REPORT_PATH: &str = "final_report.md";

pub struct ReportWriter {
    client: Arc<dyn LLMClient>,
}

impl ReportWriter {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self { client }
    }

    /// One inference call over the brief and the newline-joined notes.
    pub async fn write_report(&self, research_brief: &str, notes: &Notes) -> Result<String> {
        let prompt = prompts::final_report_generation_prompt(
            research_brief,
            &notes.joined(),
            &prompts::today(),
        );
        let report = self
            .client
            .generate_with_history(&[ConversationMessage::user(prompt)])
            .await?;

        if report.trim().is_empty() {
            return Err(AppError::LLM("Model returned an empty report".to_string()));
        }
        Ok(report)
    }
}

/// Destination for the finished report.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Persist `report`, returning where it went.
    async fn store(&self, report: &str) -> Result<String>;
}

/// Writes the report to a single file, replacing any previous one.
pub struct FileReportStore {
    path: PathBuf,
}

impl FileReportStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileReportStore {
    fn default() -> Self {
        Self::new(DEFAULT_REPORT_PATH)
    }
}

#[async_trait]
impl ReportStore for FileReportStore {
    async fn store(&self, report: &str) -> Result<String> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    AppError::Persistence(format!("{}: {}", parent.display(), e))
                })?;
            }
        }

        tokio::fs::write(&self.path, report)
            .await
            .map_err(|e| AppError::Persistence(format!("{}: {}", self.path.display(), e)))?;

        Ok(self.path.display().to_string())
    }
}
