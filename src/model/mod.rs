//! Chat-model abstraction.
//!
//! The orchestrator and summarizer talk to a `ChatModel` trait rather than
//! a vendor SDK, so model behavior can be stubbed in tests. Replies are
//! ordered content blocks: plain text or tool-use directives.

mod openai;

pub use openai::OpenAiChatModel;

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Role of one conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
    /// Synthetic record of a tool invocation, kept for conversational
    /// context.
    Tool,
}

/// One conversation turn.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn tool(content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
        }
    }
}

/// A tool offered to the model.
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl From<&crate::mcp::protocol::Tool> for ToolDefinition {
    fn from(tool: &crate::mcp::protocol::Tool) -> Self {
        Self {
            name: tool.name.clone(),
            description: tool.description.clone(),
            parameters: tool.input_schema.clone(),
        }
    }
}

/// One model call: ordered turns, optional tool catalog, token budget.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub tools: Vec<ToolDefinition>,
    pub max_tokens: u32,
}

/// One block of a model reply.
#[derive(Debug, Clone)]
pub enum ReplyBlock {
    Text(String),
    /// The model requests that a named tool be invoked.
    ToolUse { name: String, arguments: Value },
}

/// Ordered content blocks of one model reply.
#[derive(Debug, Clone, Default)]
pub struct ChatReply {
    pub blocks: Vec<ReplyBlock>,
}

impl ChatReply {
    /// The first plain-text block, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.blocks.iter().find_map(|b| match b {
            ReplyBlock::Text(text) => Some(text.as_str()),
            ReplyBlock::ToolUse { .. } => None,
        })
    }
}

/// A single-reply chat model.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatReply>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_text_skips_tool_use() {
        let reply = ChatReply {
            blocks: vec![
                ReplyBlock::ToolUse {
                    name: "get_news".to_string(),
                    arguments: json!({}),
                },
                ReplyBlock::Text("hello".to_string()),
            ],
        };
        assert_eq!(reply.first_text(), Some("hello"));
    }

    #[test]
    fn test_tool_definition_from_protocol_tool() {
        let tool = crate::mcp::protocol::Tool {
            name: "get_news".to_string(),
            description: "Fetch news".to_string(),
            input_schema: json!({"type": "object"}),
        };
        let def = ToolDefinition::from(&tool);
        assert_eq!(def.name, "get_news");
        assert_eq!(def.parameters, json!({"type": "object"}));
    }
}
