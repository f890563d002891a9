//! Bounded-retry wrapper around the summarization model call.
//!
//! The wrapper never fails: its caller always receives a usable string,
//! either the model's text, a fixed placeholder, or a descriptive error
//! message after the retry budget is spent.

use crate::model::{ChatMessage, ChatModel, ChatRequest};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// Placeholder when the model replied without usable text content.
const NO_SUMMARY: &str = "Unable to generate summary";

/// Retry wrapper for summarization calls.
pub struct Summarizer {
    model: Arc<dyn ChatModel>,
    model_name: String,
    max_tokens: u32,
    max_retries: u32,
    initial_delay: Duration,
}

impl Summarizer {
    /// Create a summarizer over the given chat model.
    pub fn new(model: Arc<dyn ChatModel>, model_name: &str, max_tokens: u32) -> Self {
        Self {
            model,
            model_name: model_name.to_string(),
            max_tokens,
            max_retries: 3,
            initial_delay: Duration::from_millis(1000),
        }
    }

    /// Override the retry policy.
    pub fn with_retry_policy(mut self, max_retries: u32, initial_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.initial_delay = initial_delay;
        self
    }

    /// Run one summarization prompt with bounded exponential backoff.
    ///
    /// Up to `max_retries` attempts; the delay starts at `initial_delay`
    /// and doubles after each failure, with no delay after the final one.
    pub async fn summarize(&self, text: &str) -> String {
        let request = ChatRequest {
            model: self.model_name.clone(),
            messages: vec![ChatMessage::user(text)],
            tools: Vec::new(),
            max_tokens: self.max_tokens,
        };

        let mut attempt = 0;
        let mut delay = self.initial_delay;

        loop {
            attempt += 1;

            match self.model.complete(&request).await {
                Ok(reply) => {
                    return reply
                        .first_text()
                        .map(str::to_string)
                        .unwrap_or_else(|| NO_SUMMARY.to_string());
                }
                Err(e) => {
                    if attempt >= self.max_retries {
                        return format!("Error generating summary: {}", e);
                    }
                    debug!("Summarization attempt {} failed, retrying: {}", attempt, e);
                    sleep(delay).await;
                    delay *= 2;
                }
            }
        }
    }
}
