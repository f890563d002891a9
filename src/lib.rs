//! Nyhet - News Bot over an In-Process MCP Bridge
//!
//! A CLI tool that answers a natural-language query by fetching news through
//! an MCP tool server and polishing the results with an LLM.
//!
//! The name "Nyhet" comes from the Norwegian word for "news item."
//!
//! # Overview
//!
//! For each query, Nyhet:
//! - Wires an MCP tool server and client together over an in-process
//!   transport pair (no subprocess, no socket)
//! - Asks a tool-capable chat model which tool to invoke for the query
//! - Executes the `get_news` tool against the News API
//! - Runs a second model pass that rewrites the raw articles into a
//!   fixed `Title` / `Summary` / `URL` / `Published At` record shape
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `mcp` - MCP protocol types, in-process transport, server, and client
//! - `news` - News API client and article formatting
//! - `model` - Chat-model abstraction and the OpenAI implementation
//! - `summarizer` - Bounded-retry wrapper around the summarization call
//! - `article` - Article record parsing from `Field: value` text blocks
//! - `orchestrator` - The per-query tool-use and summarization loop
//! - `session` - Session setup and teardown of all owned resources
//!
//! # Example
//!
//! ```rust,no_run
//! use nyhet::config::Settings;
//! use nyhet::orchestrator::Orchestrator;
//! use nyhet::session::Session;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let mut session = Session::setup(&settings).await?;
//!
//!     let orchestrator = Orchestrator::new(session.model(), &settings);
//!     let blocks = orchestrator.run(session.client_mut(), "rust language").await;
//!     for block in &blocks {
//!         println!("{}\n", block);
//!     }
//!
//!     session.teardown().await;
//!     Ok(())
//! }
//! ```

pub mod article;
pub mod cli;
pub mod config;
pub mod error;
pub mod mcp;
pub mod model;
pub mod news;
pub mod openai;
pub mod orchestrator;
pub mod session;
pub mod summarizer;

pub use error::{NyhetError, Result};
