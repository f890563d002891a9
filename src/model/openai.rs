//! OpenAI-backed chat model.

use super::{ChatMessage, ChatModel, ChatReply, ChatRequest, ReplyBlock, Role};
use crate::error::{NyhetError, Result};
use crate::openai::create_client_with_timeout;
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestUserMessageArgs, ChatCompletionTool, ChatCompletionToolType,
    CreateChatCompletionRequestArgs, FunctionObject,
};
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::warn;

/// Chat model backed by the OpenAI chat-completions API.
pub struct OpenAiChatModel {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
}

impl OpenAiChatModel {
    /// Create a model client with symmetric connect/request timeouts.
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: create_client_with_timeout(timeout),
        }
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatReply> {
        let messages = request
            .messages
            .iter()
            .map(to_api_message)
            .collect::<Result<Vec<_>>>()?;

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder
            .model(&request.model)
            .messages(messages)
            .max_completion_tokens(request.max_tokens);

        if !request.tools.is_empty() {
            let tools: Vec<ChatCompletionTool> = request
                .tools
                .iter()
                .map(|t| ChatCompletionTool {
                    r#type: ChatCompletionToolType::Function,
                    function: FunctionObject {
                        name: t.name.clone(),
                        description: Some(t.description.clone()),
                        parameters: Some(t.parameters.clone()),
                        strict: None,
                    },
                })
                .collect();
            builder.tools(tools);
        }

        let api_request = builder
            .build()
            .map_err(|e| NyhetError::Model(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(api_request)
            .await
            .map_err(|e| NyhetError::OpenAI(format!("Chat completion failed: {}", e)))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| NyhetError::Model("No response from model".to_string()))?;

        let mut blocks = Vec::new();
        if let Some(content) = choice.message.content {
            if !content.is_empty() {
                blocks.push(ReplyBlock::Text(content));
            }
        }
        if let Some(tool_calls) = choice.message.tool_calls {
            for call in tool_calls {
                let arguments = serde_json::from_str(&call.function.arguments).unwrap_or_else(|e| {
                    warn!("Unparseable tool arguments from model: {}", e);
                    json!({})
                });
                blocks.push(ReplyBlock::ToolUse {
                    name: call.function.name,
                    arguments,
                });
            }
        }

        Ok(ChatReply { blocks })
    }
}

/// Map a conversation turn to the API message type.
///
/// Tool-result turns are kept for conversational context and are not
/// re-sent in the single-round flow; if one ever reaches the API, render
/// it as user text.
fn to_api_message(message: &ChatMessage) -> Result<ChatCompletionRequestMessage> {
    match message.role {
        Role::Assistant => Ok(ChatCompletionRequestAssistantMessageArgs::default()
            .content(message.content.clone())
            .build()
            .map_err(|e| NyhetError::Model(e.to_string()))?
            .into()),
        Role::User | Role::Tool => Ok(ChatCompletionRequestUserMessageArgs::default()
            .content(message.content.clone())
            .build()
            .map_err(|e| NyhetError::Model(e.to_string()))?
            .into()),
    }
}
