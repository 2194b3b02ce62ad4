//! NewsAPI top-headlines client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use sdk::capability::{NewsLookup, Result};
use sdk::errors::AssistantError;
use sdk::types::Headline;

/// Headlines beyond this count are dropped; a spoken news digest gets
/// tedious fast.
const MAX_HEADLINES: usize = 5;

#[derive(Debug, Clone)]
pub struct NewsApiClient {
    base_url: String,
    api_key: String,
    country: String,
    client: Client,
}

impl NewsApiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            country: country.into(),
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }
}

#[async_trait]
impl NewsLookup for NewsApiClient {
    async fn fetch(&self) -> Result<Vec<Headline>> {
        let url = format!("{}/top-headlines", self.base_url);
        debug!("news request, country={}", self.country);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("country", self.country.as_str()),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AssistantError::Timeout("news service".to_string())
                } else {
                    AssistantError::ExternalService {
                        service: "news".to_string(),
                        detail: e.to_string(),
                    }
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AssistantError::ExternalService {
                service: "news".to_string(),
                detail: format!("HTTP {}", status),
            });
        }

        let payload: HeadlinesResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::Parse(format!("news response: {}", e)))?;

        let headlines = payload
            .articles
            .into_iter()
            .take(MAX_HEADLINES)
            .map(|a| Headline {
                title: a.title,
                source: a.source.and_then(|s| s.name),
            })
            .collect();

        Ok(headlines)
    }
}

#[derive(Debug, Deserialize)]
struct HeadlinesResponse {
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    title: String,
    source: Option<ArticleSource>,
}

#[derive(Debug, Deserialize)]
struct ArticleSource {
    name: Option<String>,
}
