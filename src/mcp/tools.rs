//! News tool catalog for the MCP server.

use super::protocol::Tool;
use super::server::{RegisteredTool, ToolHandler};
use crate::error::{NyhetError, Result};
use crate::news::NewsApiClient;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

/// Name of the news search tool.
pub const NEWS_TOOL: &str = "get_news";

/// Build the `get_news` tool backed by the given news client.
pub fn news_tool(news: Arc<NewsApiClient>) -> RegisteredTool {
    RegisteredTool {
        tool: Tool {
            name: NEWS_TOOL.to_string(),
            description: "Get news articles for a specific query. Input is a search query string."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query for news articles"
                    }
                },
                "required": ["query"]
            }),
        },
        handler: Arc::new(NewsToolHandler { news }),
    }
}

struct NewsToolHandler {
    news: Arc<NewsApiClient>,
}

#[async_trait]
impl ToolHandler for NewsToolHandler {
    async fn call(&self, arguments: &Value) -> Result<Vec<String>> {
        let query = arguments
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or_else(|| NyhetError::Tool("The 'query' parameter is required.".to_string()))?;

        self.news.fetch(query).await
    }
}
