//! News API client and article block formatting.
//!
//! One parameterized GET per tool invocation against the `/v2/everything`
//! endpoint, rendered as fixed four-line text blocks.

use crate::config::NewsSettings;
use crate::error::{NyhetError, Result};
use serde::Deserialize;
use tracing::debug;

/// Fallback when an article carries no description.
const NO_DESCRIPTION: &str = "No description available";

/// Client for the news provider's search endpoint.
pub struct NewsApiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    page_size: u32,
    language: String,
}

impl NewsApiClient {
    /// Create a client from settings and a resolved API key.
    pub fn new(settings: &NewsSettings, api_key: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("NewsApiClient/1.0")
            .build()
            .map_err(|e| NyhetError::News(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            page_size: settings.page_size,
            language: settings.language.clone(),
        })
    }

    /// Fetch the most recent articles for a query.
    ///
    /// Returns one four-line text block per article.
    pub async fn fetch(&self, query: &str) -> Result<Vec<String>> {
        let url = format!("{}/v2/everything", self.base_url);
        let page_size = self.page_size.to_string();

        let response = self
            .http
            .get(&url)
            .query(&[
                ("q", query),
                ("apiKey", self.api_key.as_str()),
                ("sortBy", "publishedAt"),
                ("language", self.language.as_str()),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| NyhetError::News(format!("News API request failed: {}", e)))?;

        let news: NewsResponse = response.json().await?;
        debug!(
            "News API returned {} of {} articles for '{}'",
            news.articles.len(),
            news.total_results,
            query
        );

        Ok(news.articles.iter().map(format_article).collect())
    }
}

/// Response body of the search endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    pub status: String,
    pub total_results: u32,
    pub articles: Vec<Article>,
}

/// One article as returned by the news provider.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub source: Source,
    #[serde(default)]
    pub author: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
    #[serde(default)]
    pub url_to_image: Option<String>,
    pub published_at: String,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

/// Render one article as the fixed four-line block.
fn format_article(article: &Article) -> String {
    format!(
        "Title: {}\nDescription: {}\nURL: {}\nPublished At: {}",
        article.title,
        article.description.as_deref().unwrap_or(NO_DESCRIPTION),
        article.url,
        article.published_at
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(description: Option<&str>) -> Article {
        Article {
            source: Source {
                id: None,
                name: "Example".to_string(),
            },
            author: None,
            title: "Cats Return".to_string(),
            description: description.map(String::from),
            url: "http://x/1".to_string(),
            url_to_image: None,
            published_at: "2024-01-02T10:00:00Z".to_string(),
            content: None,
        }
    }

    #[test]
    fn test_format_article() {
        let block = format_article(&article(Some("A fluffy tale")));
        assert_eq!(
            block,
            "Title: Cats Return\nDescription: A fluffy tale\nURL: http://x/1\nPublished At: 2024-01-02T10:00:00Z"
        );
    }

    #[test]
    fn test_format_article_without_description() {
        let block = format_article(&article(None));
        assert!(block.contains("Description: No description available"));
    }

    #[test]
    fn test_response_deserialization_ignores_unknown_fields() {
        let body = r#"{
            "status": "ok",
            "totalResults": 1,
            "extraField": true,
            "articles": [{
                "source": {"id": null, "name": "Example"},
                "title": "Cats Return",
                "url": "http://x/1",
                "publishedAt": "2024-01-02T10:00:00Z",
                "somethingNew": 42
            }]
        }"#;

        let news: NewsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(news.total_results, 1);
        assert_eq!(news.articles[0].title, "Cats Return");
        assert!(news.articles[0].description.is_none());
    }
}
