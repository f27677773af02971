//! LLM Provider Clients and Abstractions
//!
//! Every research phase talks to the inference service through the
//! [`LLMClient`] trait, so the loops run unchanged against any provider or a
//! test double.
//!
//! # Architecture
//!
//! - [`LLMClient`] - The core trait that all providers implement
//! - [`Provider`] - Runtime provider selection and client construction
//! - [`ProviderRegistry`] - Resolves `strata.toml` model names to clients
//! - [`structured`] - Schema-checked structured output on top of any client
//!
//! # Example
//!
//! ```ignore
//! use strata::llm::ProviderRegistry;
//!
//! let registry = ProviderRegistry::from_config(&config);
//! let client = registry.create_client_for_model("default")?;
//! let answer = client.generate("What is 2+2?").await?;
//! ```

/// Core LLM client trait and provider selection.
pub mod client;
/// Ollama `/api/chat` client.
pub mod ollama;
/// OpenAI-compatible `/chat/completions` client.
pub mod openai;
/// Registry for managing multiple LLM provider instances.
pub mod provider_registry;
/// Typed structured-output calls.
pub mod structured;

pub use client::{LLMClient, LLMResponse, ModelParams, Provider, StructuredSchema};
pub use provider_registry::ProviderRegistry;
pub use structured::invoke_structured;
