use crate::llm::client::{LLMClient, LLMResponse, ModelParams, StructuredSchema};
use crate::llm::structured::parse_json_reply;
use crate::types::{AppError, ConversationMessage, MessageRole, Result, ToolCall, ToolDefinition};
use async_trait::async_trait;
use serde_json::{json, Value};

/// Client for a local Ollama server (`/api/chat`, non-streaming).
pub struct OllamaClient {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
    params: ModelParams,
}

impl OllamaClient {
    pub fn new(base_url: String, model: String, params: ModelParams) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            params,
        }
    }

    fn request_body(&self, messages: &[ConversationMessage]) -> Value {
        json!({
            "model": self.model,
            "messages": messages.iter().map(to_wire_message).collect::<Vec<_>>(),
            "stream": false,
            "options": {
                "temperature": self.params.temperature,
                "num_predict": self.params.max_tokens,
            }
        })
    }

    async fn send(&self, body: Value) -> Result<LLMResponse> {
        let url = format!("{}/api/chat", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::LLM(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::LLM(format!(
                "Ollama request failed ({}): {}",
                status, text
            )));
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| AppError::LLM(format!("Failed to parse response: {}", e)))?;

        parse_ollama_response(&response_json)
    }
}

fn to_wire_message(message: &ConversationMessage) -> Value {
    let mut wire = json!({
        "role": message.role.as_str(),
        "content": message.content,
    });

    if message.role == MessageRole::Assistant && !message.tool_calls.is_empty() {
        wire["tool_calls"] = message
            .tool_calls
            .iter()
            .map(|call| {
                json!({
                    "function": {
                        "name": call.name,
                        "arguments": call.arguments,
                    }
                })
            })
            .collect::<Vec<_>>()
            .into();
    }

    if let Some(name) = &message.name {
        wire["tool_name"] = json!(name);
    }

    wire
}

/// Parse an Ollama chat response. Ollama does not assign call ids.
fn parse_ollama_response(json: &Value) -> Result<LLMResponse> {
    let message = json
        .get("message")
        .ok_or_else(|| AppError::LLM("No message in response".into()))?;

    let content = message
        .get("content")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    let mut tool_calls = Vec::new();
    if let Some(tc_array) = message.get("tool_calls").and_then(|v| v.as_array()) {
        for tc in tc_array {
            if let Some(func) = tc.get("function") {
                let name = func
                    .get("name")
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string();
                let arguments = func.get("arguments").cloned().unwrap_or(json!({}));

                tool_calls.push(ToolCall::new(name, arguments));
            }
        }
    }

    let finish_reason = if !tool_calls.is_empty() {
        "tool_calls".to_string()
    } else {
        json.get("done_reason")
            .and_then(|v| v.as_str())
            .unwrap_or("stop")
            .to_string()
    };

    Ok(LLMResponse {
        content,
        tool_calls,
        finish_reason,
    })
}

#[async_trait]
impl LLMClient for OllamaClient {
    async fn generate_with_history(&self, messages: &[ConversationMessage]) -> Result<String> {
        Ok(self.send(self.request_body(messages)).await?.content)
    }

    async fn generate_with_tools(
        &self,
        messages: &[ConversationMessage],
        tools: &[ToolDefinition],
    ) -> Result<LLMResponse> {
        let mut body = self.request_body(messages);
        if !tools.is_empty() {
            body["tools"] = tools
                .iter()
                .map(|t| {
                    json!({
                        "type": "function",
                        "function": {
                            "name": t.name,
                            "description": t.description,
                            "parameters": t.parameters
                        }
                    })
                })
                .collect::<Vec<_>>()
                .into();
        }

        self.send(body).await
    }

    async fn generate_structured(
        &self,
        messages: &[ConversationMessage],
        schema: &StructuredSchema,
    ) -> Result<Value> {
        let mut body = self.request_body(messages);
        body["format"] = schema.schema.clone();

        let response = self.send(body).await?;
        parse_json_reply(&response.content)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
