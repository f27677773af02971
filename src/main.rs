use anyhow::{bail, Context};
use owo_colors::OwoColorize;
use std::path::Path;
use strata::cli::output::Output;
use strata::cli::{Cli, Commands};
use strata::research::{ConversationHistory, ResearchCoordinator};
use strata::utils::toml_config::{AppSettings, ProviderConfig, StrataConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let Cli {
        config,
        verbose,
        no_color,
        json_logs,
        command,
    } = Cli::parse_args();

    let output = if no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    match command {
        Some(Commands::Config { validate }) => show_config(&config, validate, &output),
        Some(Commands::Run { request }) => {
            research(&config, request, verbose, json_logs, &output).await
        }
        None => research(&config, Vec::new(), verbose, json_logs, &output).await,
    }
}

/// Logs go to stderr so stdout carries only the conversation and report.
fn init_tracing(settings: &AppSettings, verbose: bool, json_logs: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_level))
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json_logs || settings.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn research(
    config_path: &Path,
    request: Vec<String>,
    verbose: bool,
    json_logs: bool,
    output: &Output,
) -> anyhow::Result<()> {
    let config = StrataConfig::load(config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    init_tracing(&config.app, verbose, json_logs);

    output.banner();

    let request = if request.is_empty() {
        output.ask("What would you like to research?")
    } else {
        Some(request.join(" "))
    };
    let request = request
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .context("No research request given")?;

    let coordinator = ResearchCoordinator::from_config(&config)?;

    output.step(1, 2, "Scoping the request");
    let brief = scope_request(
        &coordinator,
        request,
        config.research.max_clarification_rounds,
        output,
    )
    .await?;

    output.subheader("Research brief");
    output.block(&brief);

    output.step(2, 2, "Researching");
    let outcome = coordinator.run_execution_phase(&brief).await?;

    output.header("Research topics");
    if outcome.topics.is_empty() {
        output.info("No topics were delegated");
    }
    for topic in &outcome.topics {
        output.list_item(topic);
    }
    output.kv("Supervisor turns", &outcome.iterations.to_string());
    output.kv("Research units", &outcome.research_units.to_string());
    output.kv("Notes", &outcome.notes.len().to_string());
    output.kv("Finished", &format!("{:?}", outcome.finish_reason));

    output.header("Final report");
    output.block(&outcome.report);

    match (&outcome.saved_to, &outcome.persistence_error) {
        (Some(location), _) => output.success(&format!("Report saved to {}", location)),
        (None, Some(reason)) => output.warning(reason),
        (None, None) => {}
    }
    output.complete("Research complete");

    Ok(())
}

/// Ask clarifying questions until the scope agent writes a brief.
async fn scope_request(
    coordinator: &ResearchCoordinator,
    request: String,
    max_rounds: usize,
    output: &Output,
) -> anyhow::Result<String> {
    let mut history = ConversationHistory::from_user(request);
    let mut rounds = 0;

    loop {
        let result = coordinator.run_scope_phase(&history).await?;

        if let Some(brief) = result.research_brief {
            if let Some(verification) = result.verification.filter(|v| !v.trim().is_empty()) {
                output.info(&verification);
            }
            return Ok(brief);
        }

        if rounds >= max_rounds {
            bail!(
                "The request is still unclear after {} clarification rounds; please rerun with more detail",
                max_rounds
            );
        }
        rounds += 1;

        let question = result.question.unwrap_or_default();
        let answer = output
            .ask(&question)
            .filter(|a| !a.is_empty())
            .context("No answer given to the clarifying question")?;

        history = result.messages;
        history.push_user(answer);
    }
}

fn show_config(config_path: &Path, validate: bool, output: &Output) -> anyhow::Result<()> {
    let config = StrataConfig::load_unvalidated(config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    if validate {
        output.header("Validating configuration");
        let warnings = config.validate_with_warnings()?;
        output.success(&format!("{} is valid", config_path.display()));
        for warning in &warnings {
            output.warning(&warning.to_string());
        }
        return Ok(());
    }

    output.header("Configuration");
    output.kv("File", &config_path.display().to_string());
    output.kv("Log level", &config.app.log_level);

    output.subheader("Providers");
    let mut providers: Vec<_> = config.providers.iter().collect();
    providers.sort_by(|a, b| a.0.cmp(b.0));
    for (name, provider) in providers {
        let detail = match provider {
            ProviderConfig::Ollama { base_url } => format!("ollama @ {}", base_url),
            ProviderConfig::OpenAI { api_base, .. } => format!("openai @ {}", api_base),
        };
        output.kv(name, &detail);
    }

    output.subheader("Model roles");
    for (role, model) in config.research.model_roles() {
        output.kv(role, model);
    }

    output.subheader("Research");
    let research = &config.research;
    output.kv("Clarification", &research.allow_clarification.to_string());
    output.kv(
        "Researcher iterations",
        &research.max_researcher_iterations.to_string(),
    );
    output.kv(
        "Supervisor iterations",
        &research.max_supervisor_iterations.to_string(),
    );
    output.kv(
        "Concurrent researchers",
        &research.max_concurrent_research_units.to_string(),
    );
    output.kv("Report path", &config.output.report_path.display().to_string());

    output.hint("Run `strata config --validate` to check env vars and references");
    Ok(())
}
