//! Pre-flight checks before expensive operations.
//!
//! Validates that required credentials are available before starting a
//! query that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{NyhetError, Result};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Searching requires both the OpenAI and News API keys.
    Search,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Search => {
            check_openai_key()?;
            check_news_key(settings)?;
        }
    }
    Ok(())
}

/// Check if the OpenAI API key is configured.
fn check_openai_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(NyhetError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(NyhetError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

/// Check if the News API key is configured in settings or environment.
fn check_news_key(settings: &Settings) -> Result<()> {
    match settings.news.resolve_api_key() {
        Some(_) => Ok(()),
        None => Err(NyhetError::Config(
            "News API key not set. Add it to the config file or set NEWS_API_KEY.".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_news_key_from_settings() {
        let mut settings = Settings::default();
        settings.news.api_key = Some("key".to_string());
        assert!(check_news_key(&settings).is_ok());
    }
}
