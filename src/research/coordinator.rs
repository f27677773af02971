use crate::llm::{LLMClient, ProviderRegistry};
use crate::research::researcher::ResearchAgent;
use crate::research::scope::{ScopeAgent, ScopeResult};
use crate::research::state::{ConversationHistory, FinishReason, Notes};
use crate::research::supervisor::{Supervisor, SupervisorSettings};
use crate::research::writer::{FileReportStore, ReportStore, ReportWriter};
use crate::search::{PipelineSettings, SearchPipeline, SearchProvider, TavilyClient};
use crate::tools::{SearchDefaults, ToolRegistry};
use crate::types::Result;
use crate::utils::toml_config::{SearchProviderKind, StrataConfig};
use std::sync::Arc;
use tracing::{info, warn};

/// External collaborators, one client per model role.
#[derive(Clone)]
pub struct ResearchServices {
    pub scope_model: Arc<dyn LLMClient>,
    pub supervisor_model: Arc<dyn LLMClient>,
    pub researcher_model: Arc<dyn LLMClient>,
    pub summarization_model: Arc<dyn LLMClient>,
    pub compression_model: Arc<dyn LLMClient>,
    pub writer_model: Arc<dyn LLMClient>,
    pub search: Arc<dyn SearchProvider>,
    pub store: Arc<dyn ReportStore>,
}

impl ResearchServices {
    /// Use one client for every model role.
    pub fn single_model(
        model: Arc<dyn LLMClient>,
        search: Arc<dyn SearchProvider>,
        store: Arc<dyn ReportStore>,
    ) -> Self {
        Self {
            scope_model: model.clone(),
            supervisor_model: model.clone(),
            researcher_model: model.clone(),
            summarization_model: model.clone(),
            compression_model: model.clone(),
            writer_model: model,
            search,
            store,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResearchSettings {
    pub allow_clarification: bool,
    pub max_researcher_iterations: usize,
    pub supervisor: SupervisorSettings,
    pub pipeline: PipelineSettings,
    pub search_defaults: SearchDefaults,
}

impl Default for ResearchSettings {
    fn default() -> Self {
        Self {
            allow_clarification: true,
            max_researcher_iterations: 6,
            supervisor: SupervisorSettings::default(),
            pipeline: PipelineSettings::default(),
            search_defaults: SearchDefaults::default(),
        }
    }
}

impl ResearchSettings {
    pub fn from_config(config: &StrataConfig) -> Self {
        let research = &config.research;
        let search = &config.search;
        Self {
            allow_clarification: research.allow_clarification,
            max_researcher_iterations: research.max_researcher_iterations,
            supervisor: SupervisorSettings {
                max_iterations: research.max_supervisor_iterations,
                max_concurrent_research_units: research.max_concurrent_research_units,
                max_total_research_units: research.max_total_research_units,
            },
            pipeline: PipelineSettings {
                summary_max_tokens: search.summary_max_tokens,
                fallback_chars: search.fallback_chars,
                include_raw_content: search.include_raw_content,
            },
            search_defaults: SearchDefaults {
                max_results: search.max_results,
                topic: search.topic,
            },
        }
    }
}

/// Result of the execution phase.
#[derive(Debug, Clone)]
pub struct ExecutionOutcome {
    pub research_brief: String,
    pub report: String,
    pub notes: Notes,
    pub iterations: usize,
    pub research_units: usize,
    pub topics: Vec<String>,
    pub finish_reason: FinishReason,
    /// Where the report was stored, when persistence succeeded.
    pub saved_to: Option<String>,
    /// User-facing reason persistence failed. The report is still returned.
    pub persistence_error: Option<String>,
}

/// Entry point for both research phases.
pub struct ResearchCoordinator {
    scope: ScopeAgent,
    supervisor: Supervisor,
    writer: ReportWriter,
    store: Arc<dyn ReportStore>,
}

impl ResearchCoordinator {
    pub fn new(services: ResearchServices, settings: ResearchSettings) -> Self {
        let pipeline = Arc::new(SearchPipeline::new(
            services.search,
            services.summarization_model,
            settings.pipeline,
        ));
        let tools = Arc::new(ToolRegistry::for_researcher(
            pipeline,
            settings.search_defaults,
        ));
        let researcher = ResearchAgent::new(
            services.researcher_model,
            services.compression_model,
            tools,
            settings.max_researcher_iterations,
        );

        Self {
            scope: ScopeAgent::new(services.scope_model, settings.allow_clarification),
            supervisor: Supervisor::new(services.supervisor_model, researcher, settings.supervisor),
            writer: ReportWriter::new(services.writer_model),
            store: services.store,
        }
    }

    /// Build every collaborator from `strata.toml`.
    pub fn from_config(config: &StrataConfig) -> Result<Self> {
        let registry = ProviderRegistry::from_config(config);
        let research = &config.research;

        let search: Arc<dyn SearchProvider> = match config.search.provider {
            SearchProviderKind::Tavily => Arc::new(TavilyClient::new(
                config.search_api_key()?,
                config.search.api_base.clone(),
            )),
        };

        let services = ResearchServices {
            scope_model: registry.create_client_for_model(&research.scope_model)?,
            supervisor_model: registry.create_client_for_model(&research.supervisor_model)?,
            researcher_model: registry.create_client_for_model(&research.researcher_model)?,
            summarization_model: registry
                .create_client_for_model(&research.summarization_model)?,
            compression_model: registry.create_client_for_model(&research.compression_model)?,
            writer_model: registry.create_client_for_model(&research.writer_model)?,
            search,
            store: Arc::new(FileReportStore::new(config.output.report_path.clone())),
        };

        Ok(Self::new(services, ResearchSettings::from_config(config)))
    }

    /// One scoping turn: either a question for the user or a research brief.
    pub async fn run_scope_phase(&self, history: &ConversationHistory) -> Result<ScopeResult> {
        self.scope.run(history).await
    }

    /// Research the brief, write the report and try to persist it.
    pub async fn run_execution_phase(&self, research_brief: &str) -> Result<ExecutionOutcome> {
        info!("Starting research execution");
        let supervision = self.supervisor.run(research_brief).await?;
        info!(
            notes = supervision.notes.len(),
            iterations = supervision.iterations,
            finish_reason = ?supervision.finish_reason,
            "Supervisor finished"
        );

        let report = self
            .writer
            .write_report(research_brief, &supervision.notes)
            .await?;

        let (saved_to, persistence_error) = match self.store.store(&report).await {
            Ok(location) => {
                info!(%location, "Report saved");
                (Some(location), None)
            }
            Err(e) => {
                warn!("Failed to save report: {}", e);
                (None, Some(format!("Report was not saved: {}", e)))
            }
        };

        Ok(ExecutionOutcome {
            research_brief: research_brief.to_string(),
            report,
            notes: supervision.notes,
            iterations: supervision.iterations,
            research_units: supervision.research_units,
            topics: supervision.topics,
            finish_reason: supervision.finish_reason,
            saved_to,
            persistence_error,
        })
    }
}
