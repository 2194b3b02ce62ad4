//! OpenWeatherMap current-weather client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use sdk::capability::{Result, WeatherLookup};
use sdk::errors::AssistantError;
use sdk::types::WeatherReport;

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl OpenWeatherClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    fn map_send_error(&self, e: reqwest::Error) -> AssistantError {
        if e.is_timeout() {
            AssistantError::Timeout("weather service".to_string())
        } else if e.is_connect() {
            AssistantError::ExternalService {
                service: "weather".to_string(),
                detail: format!("cannot connect to {}", self.base_url),
            }
        } else {
            AssistantError::ExternalService {
                service: "weather".to_string(),
                detail: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl WeatherLookup for OpenWeatherClient {
    async fn fetch(&self, city: &str) -> Result<WeatherReport> {
        let url = format!("{}/weather", self.base_url);
        debug!("weather request for '{}'", city);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        match response.status() {
            status if status.is_success() => {}
            reqwest::StatusCode::NOT_FOUND => {
                return Err(AssistantError::NotFound(format!("city '{}'", city)));
            }
            reqwest::StatusCode::UNAUTHORIZED => {
                return Err(AssistantError::ExternalService {
                    service: "weather".to_string(),
                    detail: "API key rejected".to_string(),
                });
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                return Err(AssistantError::ExternalService {
                    service: "weather".to_string(),
                    detail: format!("HTTP {}: {}", status, body),
                });
            }
        }

        let payload: OwmResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::Parse(format!("weather response: {}", e)))?;

        let description = payload
            .weather
            .first()
            .map(|w| w.description.clone())
            .unwrap_or_else(|| "unknown conditions".to_string());

        Ok(WeatherReport {
            city: payload.name,
            temperature: payload.main.temp,
            feels_like: payload.main.feels_like,
            humidity: payload.main.humidity,
            description,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwmResponse {
    name: String,
    main: OwmMain,
    weather: Vec<OwmCondition>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    description: String,
}
