//! Session setup and teardown.
//!
//! A `Session` owns every per-session resource: the server task driving one
//! end of the transport pair, the connected MCP client on the other end,
//! and the model-call client. Teardown releases each of them exactly once,
//! on a best-effort basis.

use crate::config::Settings;
use crate::error::{NyhetError, Result};
use crate::mcp::server::RegisteredTool;
use crate::mcp::tools::news_tool;
use crate::mcp::{McpClient, NewsServer, Transport};
use crate::model::{ChatModel, OpenAiChatModel};
use crate::news::NewsApiClient;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

const CLIENT_NAME: &str = "nyhet";
const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Owner of all per-session resources.
pub struct Session {
    client: McpClient,
    model: Arc<dyn ChatModel>,
    server_task: Option<JoinHandle<Result<()>>>,
    closed: bool,
}

impl Session {
    /// Construct a full session from settings.
    ///
    /// On partial failure everything already constructed is torn down
    /// before the error surfaces.
    pub async fn setup(settings: &Settings) -> Result<Session> {
        let api_key = settings.news.resolve_api_key().ok_or_else(|| {
            NyhetError::Config(
                "News API key not set. Set it with: export NEWS_API_KEY='...'".to_string(),
            )
        })?;

        let news = Arc::new(NewsApiClient::new(&settings.news, api_key)?);
        let model: Arc<dyn ChatModel> = Arc::new(OpenAiChatModel::new(Duration::from_secs(
            settings.openai.timeout_seconds,
        )));

        Self::assemble(vec![news_tool(news)], model).await
    }

    /// Wire a server task and a connected client around a transport pair.
    async fn assemble(tools: Vec<RegisteredTool>, model: Arc<dyn ChatModel>) -> Result<Session> {
        let (server_end, client_end) = Transport::pair();
        let server_task = tokio::spawn(NewsServer::new(tools).serve(server_end));

        let mut client = McpClient::new(CLIENT_NAME, CLIENT_VERSION);
        if let Err(e) = client.connect(client_end).await {
            // Partial setup: release what exists before surfacing.
            server_task.abort();
            let _ = server_task.await;
            client.close();
            return Err(e);
        }

        debug!("Session ready");
        Ok(Session {
            client,
            model,
            server_task: Some(server_task),
            closed: false,
        })
    }

    /// The connected tool client.
    pub fn client_mut(&mut self) -> &mut McpClient {
        &mut self.client
    }

    /// The model-call client shared by the orchestration passes.
    pub fn model(&self) -> Arc<dyn ChatModel> {
        self.model.clone()
    }

    /// Release every owned resource. Idempotent; never raises.
    ///
    /// Each release is attempted independently so one failure cannot
    /// prevent the rest.
    pub async fn teardown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if let Some(task) = self.server_task.take() {
            task.abort();
            let _ = task.await;
        }
        self.client.close();
        debug!("Session torn down");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        // Backstop for sessions dropped without an explicit teardown.
        if let Some(task) = self.server_task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::mcp::protocol::Tool;
    use crate::mcp::server::ToolHandler;
    use crate::model::{ChatReply, ChatRequest};
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct StubModel;

    #[async_trait]
    impl crate::model::ChatModel for StubModel {
        async fn complete(&self, _request: &ChatRequest) -> Result<ChatReply> {
            Ok(ChatReply::default())
        }
    }

    struct StubHandler;

    #[async_trait]
    impl ToolHandler for StubHandler {
        async fn call(&self, _arguments: &Value) -> Result<Vec<String>> {
            Ok(vec!["stub".to_string()])
        }
    }

    fn stub_tool() -> RegisteredTool {
        RegisteredTool {
            tool: Tool {
                name: "get_news".to_string(),
                description: "Fetch news".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "query": {"type": "string", "description": "Search query"}
                    },
                    "required": ["query"]
                }),
            },
            handler: Arc::new(StubHandler),
        }
    }

    #[tokio::test]
    async fn test_setup_connects_and_lists_tools() {
        let mut session = Session::assemble(vec![stub_tool()], Arc::new(StubModel))
            .await
            .unwrap();

        let tools = session.client_mut().list_tools().await.unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "get_news");

        session.teardown().await;
    }

    #[tokio::test]
    async fn test_teardown_is_idempotent() {
        let mut session = Session::assemble(vec![stub_tool()], Arc::new(StubModel))
            .await
            .unwrap();

        session.teardown().await;
        session.teardown().await; // second call must not fault
    }

    #[tokio::test]
    async fn test_operations_after_teardown_fail_cleanly() {
        let mut session = Session::assemble(vec![stub_tool()], Arc::new(StubModel))
            .await
            .unwrap();

        session.teardown().await;
        let err = session.client_mut().list_tools().await.unwrap_err();
        assert!(matches!(err, NyhetError::ClientClosed));
    }

    #[tokio::test]
    async fn test_setup_failure_without_news_key() {
        let mut settings = Settings::default();
        settings.news.api_key = Some(String::new());
        // Only meaningful when the environment doesn't provide a key.
        if std::env::var("NEWS_API_KEY").is_err() {
            let err = Session::setup(&settings).await.err().unwrap();
            assert!(matches!(err, NyhetError::Config(_)));
        }
    }
}
