//! Configuration settings for Nyhet.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub news: NewsSettings,
    pub openai: OpenAiSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// News API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsSettings {
    /// News API key. Falls back to the NEWS_API_KEY environment variable.
    pub api_key: Option<String>,
    /// Base URL of the news provider.
    pub base_url: String,
    /// Maximum number of articles per query.
    pub page_size: u32,
    /// Article language filter.
    pub language: String,
}

impl Default for NewsSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://newsapi.org".to_string(),
            page_size: 3,
            language: "en".to_string(),
        }
    }
}

impl NewsSettings {
    /// Resolve the News API key from config or environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("NEWS_API_KEY").ok().filter(|k| !k.is_empty()))
    }
}

/// OpenAI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiSettings {
    /// Chat model used for tool selection.
    pub chat_model: String,
    /// Model used for the summarization pass.
    pub summary_model: String,
    /// Token budget for the tool-selection reply.
    pub max_tokens: u32,
    /// Token budget for the summarization reply.
    pub summary_max_tokens: u32,
    /// Request timeout in seconds (applied to connect and read).
    pub timeout_seconds: u64,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            chat_model: "gpt-4o-mini".to_string(),
            summary_model: "gpt-4o-mini".to_string(),
            max_tokens: 500,
            summary_max_tokens: 800,
            timeout_seconds: 60,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::NyhetError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nyhet")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.news.page_size, 3);
        assert_eq!(settings.news.language, "en");
        assert_eq!(settings.openai.timeout_seconds, 60);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [news]
            base_url = "http://localhost:9000"
            "#,
        )
        .unwrap();
        assert_eq!(settings.news.base_url, "http://localhost:9000");
        assert_eq!(settings.news.page_size, 3);
        assert_eq!(settings.general.log_level, "info");
    }
}
