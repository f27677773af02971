//! Supervisor delegation tests
//!
//! The supervisor model is scripted turn by turn. Researchers run against a
//! topic-keyed double so their findings are predictable regardless of the
//! order in which they finish.

mod common;

use common::mocks::{complete, delegate, MockSearchProvider, ScriptedLLMClient, TopicLLMClient};
use rstest::rstest;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use strata::llm::LLMResponse;
use strata::research::researcher::ResearchAgent;
use strata::research::supervisor::{Supervisor, SupervisorSettings};
use strata::research::FinishReason;
use strata::search::{PipelineSettings, SearchPipeline};
use strata::tools::{SearchDefaults, ToolRegistry};
use strata::types::{AppError, MessageRole, ToolCall};

fn researcher(llm: Arc<TopicLLMClient>) -> ResearchAgent {
    let pipeline = SearchPipeline::new(
        Arc::new(MockSearchProvider::new()),
        Arc::new(ScriptedLLMClient::new()),
        PipelineSettings::default(),
    );
    let tools = Arc::new(ToolRegistry::for_researcher(
        Arc::new(pipeline),
        SearchDefaults::default(),
    ));
    ResearchAgent::new(llm.clone(), llm, tools, 3)
}

fn supervisor(
    model: Arc<ScriptedLLMClient>,
    llm: Arc<TopicLLMClient>,
    settings: SupervisorSettings,
) -> Supervisor {
    Supervisor::new(model, researcher(llm), settings)
}

fn note_set(notes: &[String]) -> HashSet<String> {
    notes.iter().cloned().collect()
}

fn expected(topics: &[&str]) -> HashSet<String> {
    topics.iter().map(|t| TopicLLMClient::findings_for(t)).collect()
}

#[rstest]
#[case(60, 10, 30)]
#[case(10, 30, 60)]
#[case(30, 60, 10)]
#[tokio::test]
async fn test_parallel_notes_independent_of_completion_order(
    #[case] a: u64,
    #[case] b: u64,
    #[case] c: u64,
) {
    let llm = Arc::new(
        TopicLLMClient::new()
            .with_delay("alpha", a)
            .with_delay("beta", b)
            .with_delay("gamma", c),
    );
    let calls = vec![delegate("alpha"), delegate("beta"), delegate("gamma")];
    let ids: Vec<String> = calls.iter().map(|c| c.id.clone()).collect();
    let model = Arc::new(
        ScriptedLLMClient::new()
            .with_turn(LLMResponse::with_tool_calls("", calls))
            .with_turn(LLMResponse::with_tool_calls("", vec![complete()])),
    );

    let outcome = supervisor(model, llm.clone(), SupervisorSettings::default())
        .run("Compare three battery chemistries")
        .await
        .unwrap();

    assert_eq!(
        note_set(outcome.notes.as_slice()),
        expected(&["alpha", "beta", "gamma"])
    );
    assert_eq!(outcome.notes.len(), 3);
    assert_eq!(outcome.iterations, 1);
    assert_eq!(outcome.research_units, 3);
    assert_eq!(outcome.topics, vec!["alpha", "beta", "gamma"]);
    assert_eq!(outcome.finish_reason, FinishReason::ResearchComplete);
    assert_eq!(llm.peak_concurrency(), 3);

    // Tool results follow call order, not completion order.
    let result_ids: Vec<String> = outcome
        .messages
        .iter()
        .filter(|m| m.role == MessageRole::Tool)
        .take(3)
        .filter_map(|m| m.tool_call_id.clone())
        .collect();
    assert_eq!(result_ids, ids);
}

#[tokio::test]
async fn test_notes_appended_in_completion_order() {
    let llm = Arc::new(
        TopicLLMClient::new()
            .with_delay("alpha", 200)
            .with_delay("beta", 10)
            .with_delay("gamma", 100),
    );
    let model = Arc::new(
        ScriptedLLMClient::new()
            .with_turn(LLMResponse::with_tool_calls(
                "",
                vec![delegate("alpha"), delegate("beta"), delegate("gamma")],
            ))
            .with_turn(LLMResponse::with_tool_calls("", vec![complete()])),
    );

    let outcome = supervisor(model, llm, SupervisorSettings::default())
        .run("Compare three battery chemistries")
        .await
        .unwrap();

    assert_eq!(
        outcome.notes.as_slice(),
        &[
            TopicLLMClient::findings_for("beta"),
            TopicLLMClient::findings_for("gamma"),
            TopicLLMClient::findings_for("alpha"),
        ]
    );
    assert_eq!(outcome.topics, vec!["alpha", "beta", "gamma"]);
}

#[tokio::test]
async fn test_failed_researcher_is_omitted() {
    let llm = Arc::new(TopicLLMClient::new().with_failure("broken"));
    let model = Arc::new(
        ScriptedLLMClient::new()
            .with_turn(LLMResponse::with_tool_calls(
                "",
                vec![delegate("fine"), delegate("broken"), delegate("also fine")],
            ))
            .with_turn(LLMResponse::with_tool_calls("", vec![complete()])),
    );

    let outcome = supervisor(model, llm, SupervisorSettings::default())
        .run("brief")
        .await
        .unwrap();

    assert_eq!(
        note_set(outcome.notes.as_slice()),
        expected(&["fine", "also fine"])
    );
    assert_eq!(outcome.research_units, 3);
    let failure = outcome
        .messages
        .iter()
        .filter(|m| m.role == MessageRole::Tool)
        .nth(1)
        .unwrap();
    assert!(failure.content.starts_with("Error: research failed"));
}

#[tokio::test]
async fn test_research_complete_on_first_turn() {
    let llm = Arc::new(TopicLLMClient::new());
    let model = Arc::new(
        ScriptedLLMClient::new().with_turn(LLMResponse::with_tool_calls("", vec![complete()])),
    );

    let outcome = supervisor(model, llm.clone(), SupervisorSettings::default())
        .run("brief")
        .await
        .unwrap();

    assert!(outcome.notes.is_empty());
    assert_eq!(outcome.iterations, 0);
    assert_eq!(outcome.finish_reason, FinishReason::ResearchComplete);
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn test_complete_alongside_delegation_dispatches_nothing() {
    let llm = Arc::new(TopicLLMClient::new());
    let model = Arc::new(ScriptedLLMClient::new().with_turn(LLMResponse::with_tool_calls(
        "",
        vec![delegate("late topic"), complete()],
    )));

    let outcome = supervisor(model, llm.clone(), SupervisorSettings::default())
        .run("brief")
        .await
        .unwrap();

    assert_eq!(outcome.finish_reason, FinishReason::ResearchComplete);
    assert_eq!(outcome.research_units, 0);
    assert_eq!(llm.calls(), 0);
    let tool_results = outcome
        .messages
        .iter()
        .filter(|m| m.role == MessageRole::Tool)
        .count();
    assert_eq!(tool_results, 2);
}

#[tokio::test]
async fn test_turn_without_delegation_ends_loop() {
    let llm = Arc::new(TopicLLMClient::new());
    let model = Arc::new(
        ScriptedLLMClient::new().with_turn(LLMResponse::text("I think we are done.")),
    );

    let outcome = supervisor(model, llm, SupervisorSettings::default())
        .run("brief")
        .await
        .unwrap();

    assert_eq!(outcome.finish_reason, FinishReason::NoDelegation);
    assert_eq!(outcome.iterations, 0);
}

#[tokio::test]
async fn test_per_turn_limit() {
    let llm = Arc::new(TopicLLMClient::new());
    let model = Arc::new(
        ScriptedLLMClient::new()
            .with_turn(LLMResponse::with_tool_calls(
                "",
                vec![delegate("one"), delegate("two"), delegate("three")],
            ))
            .with_turn(LLMResponse::with_tool_calls("", vec![complete()])),
    );
    let settings = SupervisorSettings {
        max_concurrent_research_units: 2,
        ..SupervisorSettings::default()
    };

    let outcome = supervisor(model, llm, settings).run("brief").await.unwrap();

    assert_eq!(outcome.research_units, 2);
    assert_eq!(outcome.topics, vec!["one", "two"]);
    assert_eq!(note_set(outcome.notes.as_slice()), expected(&["one", "two"]));
    let overflow = outcome
        .messages
        .iter()
        .filter(|m| m.role == MessageRole::Tool)
        .nth(2)
        .unwrap();
    assert_eq!(
        overflow.content,
        "Not dispatched: at most 2 research units may run per turn."
    );
}

#[tokio::test]
async fn test_iteration_cap() {
    let llm = Arc::new(TopicLLMClient::new());
    let model = Arc::new(
        ScriptedLLMClient::new()
            .with_turn(LLMResponse::with_tool_calls("", vec![delegate("one")]))
            .with_turn(LLMResponse::with_tool_calls("", vec![delegate("two")]))
            .with_turn(LLMResponse::with_tool_calls("", vec![delegate("three")])),
    );
    let settings = SupervisorSettings {
        max_iterations: 2,
        ..SupervisorSettings::default()
    };

    let outcome = supervisor(model.clone(), llm, settings)
        .run("brief")
        .await
        .unwrap();

    assert_eq!(outcome.iterations, 2);
    assert_eq!(outcome.finish_reason, FinishReason::MaxIterations);
    assert_eq!(outcome.notes.len(), 2);
    assert_eq!(model.remaining_turns(), 1);
}

#[tokio::test]
async fn test_total_research_budget() {
    let llm = Arc::new(TopicLLMClient::new());
    let model = Arc::new(
        ScriptedLLMClient::new()
            .with_turn(LLMResponse::with_tool_calls(
                "",
                vec![delegate("one"), delegate("two")],
            ))
            .with_turn(LLMResponse::with_tool_calls("", vec![delegate("three")])),
    );
    let settings = SupervisorSettings {
        max_total_research_units: Some(1),
        ..SupervisorSettings::default()
    };

    let outcome = supervisor(model, llm, settings).run("brief").await.unwrap();

    assert_eq!(outcome.research_units, 1);
    assert_eq!(outcome.topics, vec!["one"]);
    assert_eq!(outcome.iterations, 1);
    assert_eq!(outcome.finish_reason, FinishReason::MaxIterations);
    assert_eq!(outcome.notes.len(), 1);
}

#[tokio::test]
async fn test_invalid_delegation_arguments_are_answered() {
    let llm = Arc::new(TopicLLMClient::new());
    let model = Arc::new(ScriptedLLMClient::new().with_turn(LLMResponse::with_tool_calls(
        "",
        vec![ToolCall::new("conduct_research", json!({"topic": "missing field"}))],
    )));

    let outcome = supervisor(model.clone(), llm.clone(), SupervisorSettings::default())
        .run("brief")
        .await
        .unwrap();

    assert_eq!(outcome.research_units, 0);
    assert_eq!(llm.calls(), 0);
    let reply = outcome
        .messages
        .iter()
        .find(|m| m.role == MessageRole::Tool)
        .unwrap();
    assert!(reply
        .content
        .starts_with("Error: invalid conduct_research arguments"));
    // The next supervisor turn sees the error.
    let second_request = &model.tool_requests()[1];
    assert_eq!(second_request.last().map(|m| m.role), Some(MessageRole::Tool));
}

#[tokio::test]
async fn test_supervisor_inference_failure_surfaces() {
    let model = Arc::new(ScriptedLLMClient::new().with_failed_turn("rate limited"));
    let result = supervisor(model, Arc::new(TopicLLMClient::new()), SupervisorSettings::default())
        .run("brief")
        .await;

    assert!(matches!(result, Err(AppError::LLM(msg)) if msg == "rate limited"));
}
