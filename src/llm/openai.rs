use crate::llm::client::{LLMClient, LLMResponse, ModelParams, StructuredSchema};
use crate::llm::structured::parse_json_reply;
use crate::types::{AppError, ConversationMessage, MessageRole, Result, ToolCall, ToolDefinition};
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
        ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessage,
        ChatCompletionTool, ChatCompletionToolChoiceOption, ChatCompletionToolType,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
        CreateChatCompletionResponse, FunctionCall, FunctionObject, ResponseFormat,
        ResponseFormatJsonSchema,
    },
    Client,
};
use async_trait::async_trait;
use serde_json::Value;

/// Client for OpenAI-compatible `/chat/completions` endpoints.
pub struct OpenAIClient {
    client: Client<OpenAIConfig>,
    model: String,
    params: ModelParams,
}

impl OpenAIClient {
    pub fn new(api_key: String, api_base: String, model: String, params: ModelParams) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base.trim_end_matches('/'));

        Self {
            client: Client::with_config(config),
            model,
            params,
        }
    }

    /// Request builder with the model, sampling parameters and `messages` set.
    fn request_args(
        &self,
        messages: &[ConversationMessage],
    ) -> Result<CreateChatCompletionRequestArgs> {
        let messages = messages
            .iter()
            .map(to_request_message)
            .collect::<Result<Vec<_>>>()?;

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&self.model)
            .messages(messages)
            .temperature(self.params.temperature)
            .max_completion_tokens(self.params.max_tokens);
        Ok(args)
    }

    async fn send(&self, request: CreateChatCompletionRequest) -> Result<LLMResponse> {
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AppError::LLM(format!("OpenAI API error: {}", e)))?;

        parse_openai_response(response)
    }
}

fn build_error(e: impl std::fmt::Display) -> AppError {
    AppError::LLM(format!("Failed to build request: {}", e))
}

fn to_request_message(message: &ConversationMessage) -> Result<ChatCompletionRequestMessage> {
    let content = message.content.clone();

    let wire = match message.role {
        MessageRole::System => ChatCompletionRequestMessage::System(
            ChatCompletionRequestSystemMessage::from(content),
        ),
        MessageRole::User => {
            ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage::from(content))
        }
        MessageRole::Assistant => {
            let mut args = ChatCompletionRequestAssistantMessageArgs::default();
            if !content.is_empty() {
                args.content(content);
            }
            if !message.tool_calls.is_empty() {
                args.tool_calls(
                    message
                        .tool_calls
                        .iter()
                        .map(|call| ChatCompletionMessageToolCall {
                            id: call.id.clone(),
                            r#type: ChatCompletionToolType::Function,
                            function: FunctionCall {
                                name: call.name.clone(),
                                arguments: call.arguments.to_string(),
                            },
                        })
                        .collect::<Vec<_>>(),
                );
            }
            args.build().map_err(build_error)?.into()
        }
        MessageRole::Tool => {
            let call_id = message.tool_call_id.clone().ok_or_else(|| {
                AppError::InvalidInput("Tool result message without a call id".to_string())
            })?;
            ChatCompletionRequestToolMessageArgs::default()
                .tool_call_id(call_id)
                .content(content)
                .build()
                .map_err(build_error)?
                .into()
        }
    };

    Ok(wire)
}

fn to_openai_tool(tool: &ToolDefinition) -> ChatCompletionTool {
    ChatCompletionTool {
        r#type: ChatCompletionToolType::Function,
        function: FunctionObject {
            name: tool.name.clone(),
            description: Some(tool.description.clone()),
            parameters: Some(tool.parameters.clone()),
            strict: None,
        },
    }
}

/// Parse the first choice of a chat completion.
fn parse_openai_response(response: CreateChatCompletionResponse) -> Result<LLMResponse> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AppError::LLM("No response from OpenAI".to_string()))?;

    // Serialized form gives the wire name ("stop", "tool_calls", ...).
    let finish_reason = choice
        .finish_reason
        .and_then(|reason| serde_json::to_value(reason).ok())
        .and_then(|value| value.as_str().map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string());

    let tool_calls = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|call| {
            // Unparseable arguments are kept as a string so the tool reports the
            // problem back to the model.
            let arguments = serde_json::from_str(&call.function.arguments)
                .unwrap_or(Value::String(call.function.arguments));
            ToolCall {
                id: call.id,
                name: call.function.name,
                arguments,
            }
        })
        .collect();

    Ok(LLMResponse {
        content: choice.message.content.unwrap_or_default(),
        tool_calls,
        finish_reason,
    })
}

#[async_trait]
impl LLMClient for OpenAIClient {
    async fn generate_with_history(&self, messages: &[ConversationMessage]) -> Result<String> {
        let request = self.request_args(messages)?.build().map_err(build_error)?;
        Ok(self.send(request).await?.content)
    }

    async fn generate_with_tools(
        &self,
        messages: &[ConversationMessage],
        tools: &[ToolDefinition],
    ) -> Result<LLMResponse> {
        let mut args = self.request_args(messages)?;
        if !tools.is_empty() {
            args.tools(tools.iter().map(to_openai_tool).collect::<Vec<_>>())
                .tool_choice(ChatCompletionToolChoiceOption::Auto);
        }

        let request = args.build().map_err(build_error)?;
        self.send(request).await
    }

    async fn generate_structured(
        &self,
        messages: &[ConversationMessage],
        schema: &StructuredSchema,
    ) -> Result<Value> {
        let request = self
            .request_args(messages)?
            .response_format(ResponseFormat::JsonSchema {
                json_schema: ResponseFormatJsonSchema {
                    description: None,
                    name: schema.name.clone(),
                    schema: Some(schema.schema.clone()),
                    strict: Some(false),
                },
            })
            .build()
            .map_err(build_error)?;

        let response = self.send(request).await?;
        parse_json_reply(&response.content)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
