//! Per-query orchestration: tool negotiation, execution, summarization.
//!
//! Drives one query through a single tool-use round and a summarization
//! pass. Every failure path converges to a result value; callers never see
//! a raised fault.

use crate::article::split_article_blocks;
use crate::config::Settings;
use crate::error::Result;
use crate::mcp::tools::NEWS_TOOL;
use crate::mcp::McpClient;
use crate::model::{ChatMessage, ChatModel, ChatRequest, ReplyBlock, ToolDefinition};
use crate::summarizer::Summarizer;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Shown when the model neither used a tool nor produced any article data.
const NO_ARTICLES: &str = "No articles found.";

/// Drives the tool-use and summarization loop for one query at a time.
pub struct Orchestrator {
    model: Arc<dyn ChatModel>,
    summarizer: Summarizer,
    chat_model: String,
    max_tokens: u32,
}

impl Orchestrator {
    /// Create an orchestrator sharing one chat model for both passes.
    pub fn new(model: Arc<dyn ChatModel>, settings: &Settings) -> Self {
        let summarizer = Summarizer::new(
            model.clone(),
            &settings.openai.summary_model,
            settings.openai.summary_max_tokens,
        );

        Self {
            model,
            summarizer,
            chat_model: settings.openai.chat_model.clone(),
            max_tokens: settings.openai.max_tokens,
        }
    }

    /// Replace the summarizer (e.g. to adjust its retry policy).
    pub fn with_summarizer(mut self, summarizer: Summarizer) -> Self {
        self.summarizer = summarizer;
        self
    }

    /// Run one query to completion.
    ///
    /// Returns article text blocks, summarized when possible, raw
    /// otherwise. Errors are logged and yield an empty list.
    pub async fn run(&self, client: &mut McpClient, query: &str) -> Vec<String> {
        match self.run_query(client, query).await {
            Ok(blocks) => blocks,
            Err(e) => {
                warn!("Query failed: {}", e);
                Vec::new()
            }
        }
    }

    async fn run_query(&self, client: &mut McpClient, query: &str) -> Result<Vec<String>> {
        // Fresh conversation per query; nothing persists across runs.
        let mut conversation = vec![ChatMessage::user(query)];

        let catalog = client.list_tools().await?;
        let tools: Vec<ToolDefinition> = catalog.iter().map(Into::into).collect();
        debug!("Offering {} tool(s) to the model", tools.len());

        let reply = self
            .model
            .complete(&ChatRequest {
                model: self.chat_model.clone(),
                messages: conversation.clone(),
                tools,
                max_tokens: self.max_tokens,
            })
            .await?;

        let mut raw_blocks: Vec<String> = Vec::new();
        let mut used_tool = false;

        for block in &reply.blocks {
            match block {
                ReplyBlock::Text(text) => {
                    conversation.push(ChatMessage::assistant(text.clone()));
                }
                ReplyBlock::ToolUse { name, arguments } => {
                    used_tool = true;
                    info!("Model requested tool '{}' with args: {}", name, arguments);

                    let result = client.call_tool(name, arguments.clone()).await?;
                    if name == NEWS_TOOL {
                        raw_blocks.extend(result.texts().iter().map(|s| s.to_string()));
                    }

                    // Recorded for context only; the single-round design
                    // never re-sends the conversation to the model.
                    conversation.push(ChatMessage::tool(format!(
                        "{} returned {} content block(s)",
                        name,
                        result.content.len()
                    )));
                }
            }
        }

        if !raw_blocks.is_empty() {
            let prompt = build_summary_prompt(&raw_blocks);
            conversation.push(ChatMessage::user(prompt.clone()));

            let summary = self.summarizer.summarize(&prompt).await;
            conversation.push(ChatMessage::assistant(summary.clone()));

            let summarized = split_article_blocks(&summary);
            if summarized.is_empty() {
                debug!("No well-formed summarized records; returning raw article blocks");
                return Ok(raw_blocks);
            }
            return Ok(summarized);
        }

        if !used_tool {
            return Ok(vec![NO_ARTICLES.to_string()]);
        }

        Ok(Vec::new())
    }
}

/// Instruction for the summarization pass: rewrite every article into the
/// exact four-field record shape, keeping titles and URLs verbatim.
fn build_summary_prompt(raw_blocks: &[String]) -> String {
    format!(
        "Rewrite each of the following news articles using exactly this format, \
         separating articles with a blank line:\n\
         \n\
         Title: <the original title, verbatim>\n\
         Summary: <a concise 2-3 sentence summary of the article>\n\
         URL: <the original URL, verbatim>\n\
         Published At: <the original publication date>\n\
         \n\
         Do not change any title or URL.\n\
         \n\
         Articles:\n\
         \n\
         {}",
        raw_blocks.join("\n\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::ArticleRecord;
    use crate::error::NyhetError;
    use crate::mcp::protocol::Tool;
    use crate::mcp::server::{NewsServer, RegisteredTool, ToolHandler};
    use crate::mcp::Transport;
    use crate::model::ChatReply;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    /// First call (tools offered): one tool-use directive. Second call:
    /// the canned summarization reply.
    struct StagedModel {
        tool_use: Option<(String, Value)>,
        summary: String,
    }

    #[async_trait]
    impl ChatModel for StagedModel {
        async fn complete(&self, request: &ChatRequest) -> Result<ChatReply> {
            if !request.tools.is_empty() {
                let blocks = match &self.tool_use {
                    Some((name, arguments)) => vec![ReplyBlock::ToolUse {
                        name: name.clone(),
                        arguments: arguments.clone(),
                    }],
                    None => vec![ReplyBlock::Text("Nothing to look up.".to_string())],
                };
                return Ok(ChatReply { blocks });
            }

            Ok(ChatReply {
                blocks: vec![ReplyBlock::Text(self.summary.clone())],
            })
        }
    }

    struct SeededNews(Vec<String>);

    #[async_trait]
    impl ToolHandler for SeededNews {
        async fn call(&self, _arguments: &Value) -> Result<Vec<String>> {
            Ok(self.0.clone())
        }
    }

    fn seeded_news_tool(blocks: Vec<&str>) -> RegisteredTool {
        RegisteredTool {
            tool: Tool {
                name: NEWS_TOOL.to_string(),
                description: "Fetch news".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "query": {"type": "string", "description": "Search query"}
                    },
                    "required": ["query"]
                }),
            },
            handler: std::sync::Arc::new(SeededNews(
                blocks.into_iter().map(String::from).collect(),
            )),
        }
    }

    async fn connected(tools: Vec<RegisteredTool>) -> (McpClient, tokio::task::JoinHandle<Result<()>>) {
        let (server_end, client_end) = Transport::pair();
        let task = tokio::spawn(NewsServer::new(tools).serve(server_end));
        let mut client = McpClient::new("nyhet-test", "0.0.0");
        client.connect(client_end).await.unwrap();
        (client, task)
    }

    fn orchestrator(model: StagedModel) -> Orchestrator {
        Orchestrator::new(Arc::new(model), &Settings::default())
    }

    const RAW_ONE: &str = "Title: Cats Return\nDescription: A fluffy tale\nURL: http://x/1\nPublished At: 2024-01-02T10:00:00Z";
    const RAW_TWO: &str = "Title: Dogs Delayed\nDescription: A shaggy story\nURL: http://x/2\nPublished At: 2024-01-03T11:00:00Z";

    #[tokio::test]
    async fn test_end_to_end_returns_summarized_blocks() {
        let summary = "Title: Cats Return\nSummary: Cats are back in town.\nURL: http://x/1\nPublished At: 2024-01-02T10:00:00Z\n\nTitle: Dogs Delayed\nSummary: The dogs are late again.\nURL: http://x/2\nPublished At: 2024-01-03T11:00:00Z";

        let (mut client, task) = connected(vec![seeded_news_tool(vec![RAW_ONE, RAW_TWO])]).await;
        let orchestrator = orchestrator(StagedModel {
            tool_use: Some((NEWS_TOOL.to_string(), json!({"query": "pets"}))),
            summary: summary.to_string(),
        });

        let blocks = orchestrator.run(&mut client, "pet news").await;

        assert_eq!(blocks.len(), 2);
        let records: Vec<ArticleRecord> = blocks.iter().map(|b| ArticleRecord::parse(b)).collect();
        assert_eq!(records[0].title, "Cats Return");
        assert_eq!(records[0].summary.as_deref(), Some("Cats are back in town."));
        assert_eq!(records[1].title, "Dogs Delayed");
        // Summarized output, not the raw tool blocks.
        assert!(!blocks.contains(&RAW_ONE.to_string()));

        client.close();
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_malformed_summary_falls_back_to_raw_blocks() {
        let (mut client, task) = connected(vec![seeded_news_tool(vec![RAW_ONE, RAW_TWO])]).await;
        let orchestrator = orchestrator(StagedModel {
            tool_use: Some((NEWS_TOOL.to_string(), json!({"query": "pets"}))),
            summary: "Here are your articles, nicely summarized!".to_string(),
        });

        let blocks = orchestrator.run(&mut client, "pet news").await;
        assert_eq!(blocks, vec![RAW_ONE.to_string(), RAW_TWO.to_string()]);

        client.close();
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_no_tool_use_yields_placeholder() {
        let (mut client, task) = connected(vec![seeded_news_tool(vec![RAW_ONE])]).await;
        let orchestrator = orchestrator(StagedModel {
            tool_use: None,
            summary: String::new(),
        });

        let blocks = orchestrator.run(&mut client, "hello").await;
        assert_eq!(blocks, vec![NO_ARTICLES.to_string()]);

        client.close();
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_unrelated_tool_use_collects_no_articles() {
        let mut unrelated = seeded_news_tool(vec!["should not appear"]);
        unrelated.tool.name = "get_weather".to_string();

        let (mut client, task) = connected(vec![unrelated]).await;
        let orchestrator = orchestrator(StagedModel {
            tool_use: Some(("get_weather".to_string(), json!({"query": "oslo"}))),
            summary: String::new(),
        });

        let blocks = orchestrator.run(&mut client, "weather").await;
        assert!(blocks.is_empty());

        client.close();
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_failed_summary_pass_falls_back_to_raw_blocks() {
        use std::sync::atomic::{AtomicU32, Ordering};

        /// Requests the news tool, then fails every summarization call.
        struct FailingSummaryModel {
            summary_calls: Arc<AtomicU32>,
        }

        #[async_trait]
        impl ChatModel for FailingSummaryModel {
            async fn complete(&self, request: &ChatRequest) -> Result<ChatReply> {
                if !request.tools.is_empty() {
                    return Ok(ChatReply {
                        blocks: vec![ReplyBlock::ToolUse {
                            name: NEWS_TOOL.to_string(),
                            arguments: json!({"query": "pets"}),
                        }],
                    });
                }
                self.summary_calls.fetch_add(1, Ordering::SeqCst);
                Err(NyhetError::OpenAI("rate limited".to_string()))
            }
        }

        let summary_calls = Arc::new(AtomicU32::new(0));
        let model: Arc<dyn ChatModel> = Arc::new(FailingSummaryModel {
            summary_calls: summary_calls.clone(),
        });

        let (mut client, task) = connected(vec![seeded_news_tool(vec![RAW_ONE])]).await;
        let settings = Settings::default();
        let orchestrator = Orchestrator::new(model.clone(), &settings).with_summarizer(
            Summarizer::new(
                model,
                &settings.openai.summary_model,
                settings.openai.summary_max_tokens,
            )
            .with_retry_policy(1, std::time::Duration::ZERO),
        );

        let blocks = orchestrator.run(&mut client, "pet news").await;

        // The error message is not a well-formed record, so the raw tool
        // output survives, after exactly the one permitted attempt.
        assert_eq!(blocks, vec![RAW_ONE.to_string()]);
        assert_eq!(summary_calls.load(Ordering::SeqCst), 1);

        client.close();
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_model_failure_yields_empty_result() {
        struct BrokenModel;

        #[async_trait]
        impl ChatModel for BrokenModel {
            async fn complete(&self, _request: &ChatRequest) -> Result<ChatReply> {
                Err(NyhetError::OpenAI("offline".to_string()))
            }
        }

        let (mut client, task) = connected(vec![seeded_news_tool(vec![RAW_ONE])]).await;
        let orchestrator = Orchestrator::new(Arc::new(BrokenModel), &Settings::default());

        let blocks = orchestrator.run(&mut client, "pet news").await;
        assert!(blocks.is_empty());

        client.close();
        task.await.unwrap().unwrap();
    }

    #[test]
    fn test_summary_prompt_carries_every_block() {
        let prompt = build_summary_prompt(&[RAW_ONE.to_string(), RAW_TWO.to_string()]);
        assert!(prompt.contains("Cats Return"));
        assert!(prompt.contains("Dogs Delayed"));
        assert!(prompt.contains("Do not change any title or URL."));
    }
}
