//! MCP (Model Context Protocol) over an in-process transport.
//!
//! Contains the JSON-RPC protocol types, the cross-wired transport pair,
//! the tool server, the tool client, and the news tool catalog.

pub mod client;
pub mod protocol;
pub mod server;
pub mod tools;
pub mod transport;

pub use client::McpClient;
pub use server::{NewsServer, RegisteredTool, ToolHandler};
pub use transport::Transport;
