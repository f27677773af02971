//! Configuration loading tests
//!
//! Writes `strata.toml` files to temp directories and builds the registry and
//! coordinator from them. Each test uses its own env var names so tests can
//! run in parallel.

use std::io::Write;
use std::path::PathBuf;
use strata::llm::ProviderRegistry;
use strata::research::ResearchCoordinator;
use strata::utils::toml_config::{ConfigError, ConfigWarningKind, StrataConfig};
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn local_config(search_key_env: &str) -> String {
    format!(
        r#"
[providers.local]
type = "ollama"
base_url = "http://127.0.0.1:11434"

[models.default]
provider = "local"
model = "llama3.1"
temperature = 0.2

[search]
api_key_env = "{search_key_env}"
max_results = 4
topic = "news"

[research]
max_concurrent_research_units = 5
max_total_research_units = 12

[output]
report_path = "out/report.md"
"#
    )
}

#[test]
fn test_load_and_validate_local_config() {
    std::env::set_var("STRATA_CFG_TEST_SEARCH_KEY_1", "tvly-test");
    let file = write_config(&local_config("STRATA_CFG_TEST_SEARCH_KEY_1"));

    let config = StrataConfig::load(file.path()).unwrap();

    assert_eq!(config.search.max_results, 4);
    assert_eq!(config.research.max_concurrent_research_units, 5);
    assert_eq!(config.research.max_total_research_units, Some(12));
    assert_eq!(config.research.writer_model, "default");
    assert_eq!(config.output.report_path, PathBuf::from("out/report.md"));
    assert_eq!(config.search_api_key().unwrap(), "tvly-test");
    assert!(config.validate_with_warnings().unwrap().is_empty());
}

#[test]
fn test_missing_search_key_fails_validation() {
    let file = write_config(&local_config("STRATA_CFG_TEST_SEARCH_KEY_UNSET"));

    let result = StrataConfig::load(file.path());

    assert!(matches!(
        result,
        Err(ConfigError::MissingEnvVar(name)) if name == "STRATA_CFG_TEST_SEARCH_KEY_UNSET"
    ));
}

#[test]
fn test_invalid_toml_is_parse_error() {
    let file = write_config("[research\nmax_supervisor_iterations = 3");
    assert!(matches!(
        StrataConfig::load_unvalidated(file.path()),
        Err(ConfigError::ParseError(_))
    ));
}

#[test]
fn test_unused_model_is_a_warning() {
    std::env::set_var("STRATA_CFG_TEST_SEARCH_KEY_2", "tvly-test");
    let content = format!(
        "{}\n[models.spare]\nprovider = \"local\"\nmodel = \"qwen3\"\n",
        local_config("STRATA_CFG_TEST_SEARCH_KEY_2")
    );
    let file = write_config(&content);

    let config = StrataConfig::load(file.path()).unwrap();
    let warnings = config.validate_with_warnings().unwrap();

    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, ConfigWarningKind::UnusedModel);
    assert!(warnings[0].message.contains("spare"));
}

#[test]
fn test_registry_builds_ollama_clients() {
    std::env::set_var("STRATA_CFG_TEST_SEARCH_KEY_3", "tvly-test");
    let file = write_config(&local_config("STRATA_CFG_TEST_SEARCH_KEY_3"));
    let config = StrataConfig::load(file.path()).unwrap();

    let registry = ProviderRegistry::from_config(&config);
    let client = registry.create_client_for_model("default").unwrap();

    assert_eq!(client.model_name(), "llama3.1");
    assert!(registry.create_client_for_model("missing").is_err());
}

#[test]
fn test_coordinator_from_config() {
    std::env::set_var("STRATA_CFG_TEST_SEARCH_KEY_4", "tvly-test");
    let file = write_config(&local_config("STRATA_CFG_TEST_SEARCH_KEY_4"));
    let config = StrataConfig::load(file.path()).unwrap();

    assert!(ResearchCoordinator::from_config(&config).is_ok());
}

#[test]
fn test_shipped_config_parses() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("strata.toml");
    let config = StrataConfig::load_unvalidated(&path).unwrap();

    for (_, model) in config.research.model_roles() {
        assert!(config.get_model(model).is_some(), "unknown model {}", model);
    }
    assert!(config.get_provider("openai").is_some());
    assert!(config.get_provider("local").is_some());
}
