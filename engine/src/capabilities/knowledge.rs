//! Wikipedia topic summaries via the REST page-summary endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use sdk::capability::{KnowledgeLookup, Result};
use sdk::errors::AssistantError;

#[derive(Debug, Clone)]
pub struct WikipediaClient {
    base_url: String,
    client: Client,
}

impl WikipediaClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }
}

#[async_trait]
impl KnowledgeLookup for WikipediaClient {
    async fn summarize(&self, topic: &str) -> Result<String> {
        // The summary endpoint wants the title segment percent-safe; spaces
        // become underscores per wiki convention.
        let title = topic.trim().replace(' ', "_");
        let url = format!("{}/page/summary/{}", self.base_url, title);
        debug!("knowledge request for '{}'", topic);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                AssistantError::Timeout("knowledge service".to_string())
            } else {
                AssistantError::ExternalService {
                    service: "knowledge".to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AssistantError::NotFound(format!("topic '{}'", topic)));
        }
        if !response.status().is_success() {
            return Err(AssistantError::ExternalService {
                service: "knowledge".to_string(),
                detail: format!("HTTP {}", response.status()),
            });
        }

        let payload: PageSummary = response
            .json()
            .await
            .map_err(|e| AssistantError::Parse(format!("summary response: {}", e)))?;

        if payload.page_type.as_deref() == Some("disambiguation") {
            return Err(AssistantError::Ambiguous(topic.to_string()));
        }

        match payload.extract {
            Some(extract) if !extract.is_empty() => Ok(extract),
            _ => Err(AssistantError::NotFound(format!("topic '{}'", topic))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PageSummary {
    #[serde(rename = "type")]
    page_type: Option<String>,
    extract: Option<String>,
}
