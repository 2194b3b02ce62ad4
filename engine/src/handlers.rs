//! Command handlers for CLI operations
//!
//! This module implements the handlers for all CLI commands:
//! - listen: Run the interactive session
//! - run: Interpret a single utterance and exit
//! - doctor: Validate configuration and report capability status

use anyhow::Result;
use serde_json::json;
use std::sync::{Arc, Mutex};

use sdk::capability::SpeechOutput;

use crate::assistant::AssistantCore;
use crate::capabilities::{
    CapabilityRegistry, ConsoleCapture, ConsoleSpeech, FileManager, HueBridge, NewsApiClient,
    OpenWeatherClient, PlatformControl, ScreenshotTool, SysinfoMonitor, WikipediaClient,
};
use crate::config::Config;

/// Output format for command results
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for machine consumption
    Json,
}

/// Assemble the capability registry from the config's enable flags.
///
/// A capability whose flag is on but whose required settings are missing
/// (no API key, no bridge host) stays disabled with a warning rather than
/// failing startup.
pub fn build_registry(config: &Config) -> CapabilityRegistry {
    let mut registry = CapabilityRegistry::empty();

    if config.capabilities.weather {
        match &config.weather.api_key {
            Some(key) => {
                registry.weather = Some(Box::new(OpenWeatherClient::new(
                    config.weather.base_url.clone(),
                    key.clone(),
                    config.weather.timeout_secs,
                )));
            }
            None => tracing::warn!("weather enabled but no API key configured"),
        }
    }

    if config.capabilities.news {
        match &config.news.api_key {
            Some(key) => {
                registry.news = Some(Box::new(NewsApiClient::new(
                    config.news.base_url.clone(),
                    key.clone(),
                    config.news.country.clone(),
                )));
            }
            None => tracing::warn!("news enabled but no API key configured"),
        }
    }

    if config.capabilities.knowledge {
        registry.knowledge = Some(Box::new(WikipediaClient::new(
            config.knowledge.base_url.clone(),
        )));
    }

    if config.capabilities.smart_home {
        registry.smart_home = Some(Box::new(HueBridge::new(
            config.smart_home.host.clone(),
            config.smart_home.username.clone(),
        )));
    }

    if config.capabilities.system_monitor {
        registry.monitor = Some(Box::new(SysinfoMonitor::new()));
    }

    if config.capabilities.process_control {
        registry.process = Some(Box::new(PlatformControl));
    }

    if config.capabilities.files {
        registry.files = Some(Box::new(FileManager::new(
            config.files.common_dirs.clone(),
        )));
    }

    if config.capabilities.screen {
        registry.screen = Some(Box::new(ScreenshotTool));
    }

    registry
}

/// Run the interactive session until the user exits.
pub async fn handle_listen(config: &Config) -> Result<()> {
    let registry = build_registry(config);
    let mut core = AssistantCore::new(
        config,
        registry,
        Box::new(ConsoleCapture),
        Box::new(ConsoleSpeech::new(config.core.assistant_name.clone())),
    );
    core.run().await?;
    Ok(())
}

/// Interpret a single utterance and print the response.
pub async fn handle_run(utterance: String, config: &Config, format: OutputFormat) -> Result<()> {
    let registry = build_registry(config);

    match format {
        OutputFormat::Text => {
            let mut core = AssistantCore::new(
                config,
                registry,
                Box::new(ConsoleCapture),
                Box::new(ConsoleSpeech::new(config.core.assistant_name.clone())),
            );
            core.interpret(&utterance).await;
            core.deliver_due();
        }
        OutputFormat::Json => {
            let recorder = RecordingSpeech::shared();
            let lines = recorder.lines.clone();
            let mut core = AssistantCore::new(
                config,
                registry,
                Box::new(ConsoleCapture),
                Box::new(recorder),
            );
            core.interpret(&utterance).await;
            core.deliver_due();

            let responses = lines.lock().map(|l| l.clone()).unwrap_or_default();
            let output = json!({
                "utterance": utterance,
                "responses": responses,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

/// Validate configuration and report which capabilities are usable.
pub async fn handle_doctor(config: &Config, format: OutputFormat) -> Result<()> {
    let registry = build_registry(config);
    let enabled = registry.enabled_names();

    match format {
        OutputFormat::Text => {
            println!("Aria diagnostics");
            println!();
            println!("  assistant name: {}", config.core.assistant_name);
            println!("  log level:      {}", config.core.log_level);
            println!("  data dir:       {}", config.core.data_dir.display());
            println!();
            println!("Capabilities:");
            for name in &[
                "weather",
                "news",
                "knowledge",
                "smart_home",
                "system_monitor",
                "process_control",
                "files",
                "screen",
            ] {
                let status = if enabled.contains(name) {
                    "ready"
                } else {
                    "off"
                };
                println!("  {:16} {}", name, status);
            }
            if config.capabilities.weather && config.weather.api_key.is_none() {
                println!();
                println!("Hint: set ARIA_WEATHER_API_KEY to enable weather lookups");
            }
            if config.capabilities.news && config.news.api_key.is_none() {
                println!("Hint: set ARIA_NEWS_API_KEY to enable news lookups");
            }
        }
        OutputFormat::Json => {
            let output = json!({
                "assistant_name": config.core.assistant_name,
                "log_level": config.core.log_level,
                "data_dir": config.core.data_dir,
                "capabilities": enabled,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

/// Speech output that records everything said, for JSON mode.
struct RecordingSpeech {
    lines: Arc<Mutex<Vec<String>>>,
}

impl RecordingSpeech {
    fn shared() -> Self {
        Self {
            lines: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl SpeechOutput for RecordingSpeech {
    fn say(&self, text: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(text.to_string());
        }
    }
}
