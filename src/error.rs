//! Error types for Nyhet.

use thiserror::Error;

/// Library-level error type for Nyhet operations.
#[derive(Error, Debug)]
pub enum NyhetError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("News API error: {0}")]
    News(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Model request error: {0}")]
    Model(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Transport closed")]
    TransportClosed,

    #[error("Client is closed")]
    ClientClosed,

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Tool error: {0}")]
    Tool(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Nyhet operations.
pub type Result<T> = std::result::Result<T, NyhetError>;
