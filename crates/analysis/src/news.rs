//! News headline client.
//!
//! Fetches recent headlines from a JSON news endpoint and scores them with
//! the polarity lexicon. A fetch failure is terminal for the cycle's
//! sentiment stage only; the caller falls back to neutral sentiment.

use crate::sentiment::score_text;
use market_signal_core::{MarketDataError, NewsConfig, SentimentSample};
use serde::Deserialize;
use std::time::Duration;

/// One post from the news endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsPost {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    results: Vec<NewsPost>,
}

/// Client for a CryptoPanic-style JSON news feed.
pub struct NewsClient {
    http: reqwest::Client,
    endpoint: String,
    max_headlines: usize,
}

impl NewsClient {
    /// Creates a new client from the news configuration.
    #[must_use]
    pub fn new(config: &NewsConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            endpoint: config.endpoint.clone(),
            max_headlines: config.max_headlines,
        }
    }

    /// Fetches the most recent posts, capped at `max_headlines`.
    ///
    /// # Errors
    /// Returns `Transport` on network failure, `Upstream` on a non-success
    /// HTTP status, and `DataUnavailable` when the feed has no entries.
    pub async fn fetch_posts(&self) -> Result<Vec<NewsPost>, MarketDataError> {
        let response = self
            .http
            .get(&self.endpoint)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(MarketDataError::Upstream {
                code: i64::from(status.as_u16()),
                message: text,
            });
        }

        let body: NewsResponse = response
            .json()
            .await
            .map_err(|e| MarketDataError::Parse(e.to_string()))?;

        if body.results.is_empty() {
            return Err(MarketDataError::unavailable("news feed"));
        }

        Ok(body
            .results
            .into_iter()
            .take(self.max_headlines)
            .collect())
    }

    /// Fetches posts and scores each headline.
    ///
    /// # Errors
    /// Propagates the fetch errors from [`NewsClient::fetch_posts`].
    pub async fn analyze(&self) -> Result<Vec<SentimentSample>, MarketDataError> {
        let posts = self.fetch_posts().await?;
        Ok(posts.iter().map(score_post).collect())
    }
}

/// Scores one post, combining title and description when both are present.
#[must_use]
pub fn score_post(post: &NewsPost) -> SentimentSample {
    let full_text = match post.description.as_deref() {
        Some(desc) if !desc.is_empty() => format!("{}. {}", post.title, desc),
        _ => post.title.clone(),
    };
    let compound_score = score_text(&full_text);
    tracing::debug!(
        headline = %post.title,
        score = compound_score,
        "scored headline"
    );

    SentimentSample {
        headline: post.title.clone(),
        compound_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_post_uses_title_and_description() {
        let title_only = NewsPost {
            title: "Bitcoin rally continues".to_string(),
            description: None,
        };
        let with_description = NewsPost {
            title: "Bitcoin rally continues".to_string(),
            description: Some("Analysts see further gains after ETF approval".to_string()),
        };

        let a = score_post(&title_only);
        let b = score_post(&with_description);
        assert!(a.compound_score > 0.0);
        // Description adds more positive words, pushing the score higher
        assert!(b.compound_score > a.compound_score);
        assert_eq!(b.headline, "Bitcoin rally continues");
    }

    #[test]
    fn test_news_response_tolerates_missing_fields() {
        let body: NewsResponse = serde_json::from_str(r#"{"results":[{"title":"x"},{}]}"#).unwrap();
        assert_eq!(body.results.len(), 2);
        assert_eq!(body.results[1].title, "");

        let empty: NewsResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.results.is_empty());
    }
}
