//! Typed structured-output calls.
//!
//! Schemas are derived with `schemars` from the Rust response type, sent to the
//! provider, and the returned JSON is deserialized back into that type. A reply
//! that does not fit the type is an inference failure, not a panic.

use crate::llm::client::{LLMClient, StructuredSchema};
use crate::types::{AppError, ConversationMessage, Result};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

/// Build the schema request for `T`.
pub fn schema_for<T: JsonSchema>() -> StructuredSchema {
    let schema = schemars::schema_for!(T);
    StructuredSchema {
        name: T::schema_name().to_string(),
        schema: serde_json::to_value(&schema).unwrap_or(serde_json::Value::Null),
    }
}

/// Ask `client` for a `T` and validate the reply against it.
pub async fn invoke_structured<T>(
    client: &dyn LLMClient,
    messages: &[ConversationMessage],
) -> Result<T>
where
    T: DeserializeOwned + JsonSchema,
{
    let schema = schema_for::<T>();
    let value = client.generate_structured(messages, &schema).await?;

    serde_json::from_value(value).map_err(|e| {
        AppError::LLM(format!(
            "Response from '{}' violates schema '{}': {}",
            client.model_name(),
            schema.name,
            e
        ))
    })
}

/// Parse a JSON document out of model text.
///
/// Models sometimes wrap JSON in a Markdown fence even when asked not to.
pub fn parse_json_reply(text: &str) -> Result<serde_json::Value> {
    let trimmed = text.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed);

    serde_json::from_str(unfenced)
        .map_err(|e| AppError::LLM(format!("Model returned invalid JSON: {}", e)))
}
