//! TOML-based configuration for Strata
//!
//! Providers, models, search and research limits are declared in a single
//! `strata.toml`. API keys are never stored in the file; each provider names
//! the environment variable that holds its key.

use crate::search::SearchTopic;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "strata.toml";

/// Root configuration structure loaded from strata.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrataConfig {
    #[serde(default)]
    pub app: AppSettings,

    /// Named LLM provider configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Named model configurations that reference providers
    #[serde(default)]
    pub models: HashMap<String, ModelConfig>,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub research: ResearchConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

// ============= Application Settings =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub json_logs: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

// ============= Provider Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
    },
    OpenAI {
        /// Environment variable containing API key
        api_key_env: String,
        #[serde(default = "default_openai_base")]
        api_base: String,
    },
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_openai_base() -> String {
    "https://api.openai.com/v1".to_string()
}

// ============= Model Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Reference to a provider name defined in [providers]
    pub provider: String,

    /// Model name/identifier to use with the provider
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_model_max_tokens")]
    pub max_tokens: u32,
}

fn default_temperature() -> f32 {
    0.0
}

fn default_model_max_tokens() -> u32 {
    4096
}

// ============= Search Configuration =============

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchProviderKind {
    #[default]
    Tavily,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub provider: SearchProviderKind,

    /// Environment variable containing the search API key
    #[serde(default = "default_search_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_search_base")]
    pub api_base: String,

    /// Results requested per query
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    #[serde(default)]
    pub topic: SearchTopic,

    #[serde(default = "default_true")]
    pub include_raw_content: bool,

    /// Token budget for page text sent to the summarizer (4 chars per token)
    #[serde(default = "default_summary_max_tokens")]
    pub summary_max_tokens: usize,

    /// Characters of raw page text kept when summarization fails
    #[serde(default = "default_fallback_chars")]
    pub fallback_chars: usize,
}

fn default_search_key_env() -> String {
    "TAVILY_API_KEY".to_string()
}

fn default_search_base() -> String {
    crate::search::tavily::DEFAULT_TAVILY_BASE.to_string()
}

fn default_max_results() -> usize {
    3
}

fn default_true() -> bool {
    true
}

fn default_summary_max_tokens() -> usize {
    100_000
}

fn default_fallback_chars() -> usize {
    1000
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider: SearchProviderKind::default(),
            api_key_env: default_search_key_env(),
            api_base: default_search_base(),
            max_results: default_max_results(),
            topic: SearchTopic::default(),
            include_raw_content: true,
            summary_max_tokens: default_summary_max_tokens(),
            fallback_chars: default_fallback_chars(),
        }
    }
}

// ============= Research Configuration =============

/// Model roles and loop bounds. Every `*_model` names an entry in [models].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchConfig {
    #[serde(default = "default_model_ref")]
    pub scope_model: String,

    #[serde(default = "default_model_ref")]
    pub supervisor_model: String,

    #[serde(default = "default_model_ref")]
    pub researcher_model: String,

    #[serde(default = "default_model_ref")]
    pub summarization_model: String,

    #[serde(default = "default_model_ref")]
    pub compression_model: String,

    #[serde(default = "default_model_ref")]
    pub writer_model: String,

    #[serde(default = "default_true")]
    pub allow_clarification: bool,

    #[serde(default = "default_max_clarification_rounds")]
    pub max_clarification_rounds: usize,

    #[serde(default = "default_max_researcher_iterations")]
    pub max_researcher_iterations: usize,

    #[serde(default = "default_max_supervisor_iterations")]
    pub max_supervisor_iterations: usize,

    #[serde(default = "default_max_concurrent_research_units")]
    pub max_concurrent_research_units: usize,

    /// Upper bound on researchers over a whole run; unbounded when absent
    #[serde(default)]
    pub max_total_research_units: Option<usize>,
}

fn default_model_ref() -> String {
    "default".to_string()
}

fn default_max_clarification_rounds() -> usize {
    3
}

fn default_max_researcher_iterations() -> usize {
    6
}

fn default_max_supervisor_iterations() -> usize {
    6
}

fn default_max_concurrent_research_units() -> usize {
    3
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            scope_model: default_model_ref(),
            supervisor_model: default_model_ref(),
            researcher_model: default_model_ref(),
            summarization_model: default_model_ref(),
            compression_model: default_model_ref(),
            writer_model: default_model_ref(),
            allow_clarification: true,
            max_clarification_rounds: default_max_clarification_rounds(),
            max_researcher_iterations: default_max_researcher_iterations(),
            max_supervisor_iterations: default_max_supervisor_iterations(),
            max_concurrent_research_units: default_max_concurrent_research_units(),
            max_total_research_units: None,
        }
    }
}

impl ResearchConfig {
    /// `(role, model name)` for every model role.
    pub fn model_roles(&self) -> [(&'static str, &str); 6] {
        [
            ("scope_model", self.scope_model.as_str()),
            ("supervisor_model", self.supervisor_model.as_str()),
            ("researcher_model", self.researcher_model.as_str()),
            ("summarization_model", self.summarization_model.as_str()),
            ("compression_model", self.compression_model.as_str()),
            ("writer_model", self.writer_model.as_str()),
        ]
    }
}

// ============= Output Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_report_path")]
    pub report_path: PathBuf,
}

fn default_report_path() -> PathBuf {
    PathBuf::from(crate::research::writer::DEFAULT_REPORT_PATH)
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_path: default_report_path(),
        }
    }
}

// ============= Configuration Loading & Validation =============

/// Configuration warnings that don't prevent operation but may indicate issues
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub kind: ConfigWarningKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigWarningKind {
    UnusedProvider,
    UnusedModel,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),

    #[error("Provider '{0}' referenced by model '{1}' does not exist")]
    MissingProvider(String, String),

    #[error("Model '{0}' referenced by research.{1} does not exist")]
    MissingModel(String, String),
}

impl From<ConfigError> for crate::types::AppError {
    fn from(err: ConfigError) -> Self {
        crate::types::AppError::Configuration(err.to_string())
    }
}

impl StrataConfig {
    /// Load and validate configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load_unvalidated(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file without checking references or environment
    pub fn load_unvalidated<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate the configuration for internal consistency and env var availability
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Validate provider env vars
        for provider in self.providers.values() {
            match provider {
                ProviderConfig::OpenAI { api_key_env, .. } => {
                    self.validate_env_var(api_key_env)?;
                }
                ProviderConfig::Ollama { .. } => {}
            }
        }
        self.validate_env_var(&self.search.api_key_env)?;

        for (model_name, model) in &self.models {
            if !self.providers.contains_key(&model.provider) {
                return Err(ConfigError::MissingProvider(
                    model.provider.clone(),
                    model_name.clone(),
                ));
            }
            if !(0.0..=2.0).contains(&model.temperature) {
                return Err(ConfigError::ValidationError(format!(
                    "Model '{}' has temperature {} outside 0.0..=2.0",
                    model_name, model.temperature
                )));
            }
        }

        for (role, model_name) in self.research.model_roles() {
            if !self.models.contains_key(model_name) {
                return Err(ConfigError::MissingModel(
                    model_name.to_string(),
                    role.to_string(),
                ));
            }
        }

        let bounds = [
            (
                "research.max_researcher_iterations",
                self.research.max_researcher_iterations,
            ),
            (
                "research.max_supervisor_iterations",
                self.research.max_supervisor_iterations,
            ),
            (
                "research.max_concurrent_research_units",
                self.research.max_concurrent_research_units,
            ),
            (
                "research.max_clarification_rounds",
                self.research.max_clarification_rounds,
            ),
            ("search.max_results", self.search.max_results),
            ("search.summary_max_tokens", self.search.summary_max_tokens),
        ];
        for (name, value) in bounds {
            if value == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be at least 1",
                    name
                )));
            }
        }
        if self.research.max_total_research_units == Some(0) {
            return Err(ConfigError::ValidationError(
                "research.max_total_research_units must be at least 1 when set".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate configuration with warnings for unused items
    ///
    /// Returns Ok with warnings, or Err if validation fails
    pub fn validate_with_warnings(&self) -> Result<Vec<ConfigWarning>, ConfigError> {
        self.validate()?;

        let mut warnings = Vec::new();
        warnings.extend(self.check_unused_providers());
        warnings.extend(self.check_unused_models());
        Ok(warnings)
    }

    /// Check for providers that aren't referenced by any model
    fn check_unused_providers(&self) -> Vec<ConfigWarning> {
        let referenced: HashSet<_> = self.models.values().map(|m| m.provider.as_str()).collect();

        let mut warnings: Vec<_> = self
            .providers
            .keys()
            .filter(|name| !referenced.contains(name.as_str()))
            .map(|name| ConfigWarning {
                kind: ConfigWarningKind::UnusedProvider,
                message: format!(
                    "Provider '{}' is defined but not referenced by any model",
                    name
                ),
            })
            .collect();
        warnings.sort_by(|a, b| a.message.cmp(&b.message));
        warnings
    }

    /// Check for models that no research role uses
    fn check_unused_models(&self) -> Vec<ConfigWarning> {
        let referenced: HashSet<_> = self
            .research
            .model_roles()
            .into_iter()
            .map(|(_, model)| model)
            .collect();

        let mut warnings: Vec<_> = self
            .models
            .keys()
            .filter(|name| !referenced.contains(name.as_str()))
            .map(|name| ConfigWarning {
                kind: ConfigWarningKind::UnusedModel,
                message: format!(
                    "Model '{}' is defined but not used by any research role",
                    name
                ),
            })
            .collect();
        warnings.sort_by(|a, b| a.message.cmp(&b.message));
        warnings
    }

    fn validate_env_var(&self, name: &str) -> Result<(), ConfigError> {
        std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))?;
        Ok(())
    }

    /// Get a resolved value from an env var reference
    pub fn resolve_env(&self, env_name: &str) -> Option<String> {
        std::env::var(env_name).ok()
    }

    /// Get the search API key from the environment
    pub fn search_api_key(&self) -> Result<String, ConfigError> {
        self.resolve_env(&self.search.api_key_env)
            .ok_or_else(|| ConfigError::MissingEnvVar(self.search.api_key_env.clone()))
    }

    /// Get provider by name
    pub fn get_provider(&self, name: &str) -> Option<&ProviderConfig> {
        self.providers.get(name)
    }

    /// Get model by name
    pub fn get_model(&self, name: &str) -> Option<&ModelConfig> {
        self.models.get(name)
    }
}
