//! Hue-style light bridge over the local REST API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use sdk::capability::{Result, SmartHomeBridge};
use sdk::errors::AssistantError;

#[derive(Debug, Clone)]
pub struct HueBridge {
    host: String,
    username: String,
    client: Client,
}

impl HueBridge {
    pub fn new(host: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            client: Client::builder()
                .timeout(Duration::from_secs(5))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    async fn put_state(&self, device_id: u8, state: &LightState) -> Result<()> {
        let url = format!(
            "{}/api/{}/lights/{}/state",
            self.host, self.username, device_id
        );
        debug!("bridge state update for light {}", device_id);

        let response = self
            .client
            .put(&url)
            .json(state)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    AssistantError::ExternalService {
                        service: "smart home bridge".to_string(),
                        detail: format!("cannot reach bridge at {}", self.host),
                    }
                } else {
                    AssistantError::ExternalService {
                        service: "smart home bridge".to_string(),
                        detail: e.to_string(),
                    }
                }
            })?;

        if !response.status().is_success() {
            return Err(AssistantError::ExternalService {
                service: "smart home bridge".to_string(),
                detail: format!("HTTP {}", response.status()),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl SmartHomeBridge for HueBridge {
    async fn set_light(&self, device_id: u8, on: bool) -> Result<()> {
        self.put_state(
            device_id,
            &LightState {
                on: Some(on),
                bri: None,
            },
        )
        .await
    }

    async fn set_brightness(&self, device_id: u8, level: u8) -> Result<()> {
        self.put_state(
            device_id,
            &LightState {
                on: Some(true),
                bri: Some(level),
            },
        )
        .await
    }
}

#[derive(Debug, Serialize)]
struct LightState {
    #[serde(skip_serializing_if = "Option::is_none")]
    on: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bri: Option<u8>,
}
