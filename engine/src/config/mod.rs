//! Configuration management
//!
//! Configuration is stored in TOML format at ~/.aria/config.toml.
//!
//! # Configuration Sections
//!
//! - **core**: Assistant name, log level, data directory
//! - **capabilities**: Capability enablement flags
//! - **weather**, **news**, **knowledge**, **smart_home**, **files**:
//!   per-capability settings
//!
//! API keys may live in the file or in the environment
//! (`ARIA_WEATHER_API_KEY`, `ARIA_NEWS_API_KEY`); the environment wins.
//!
//! # Path Expansion
//!
//! Paths support ~ expansion to the user's home directory. The data
//! directory is created on first load if missing.

use sdk::errors::AssistantError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure, loaded from ~/.aria/config.toml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Core assistant settings
    pub core: CoreConfig,

    /// Capability enablement
    #[serde(default)]
    pub capabilities: CapabilitiesConfig,

    /// Weather service settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// News service settings
    #[serde(default)]
    pub news: NewsConfig,

    /// Knowledge service settings
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Smart home bridge settings
    #[serde(default)]
    pub smart_home: SmartHomeConfig,

    /// File access settings
    #[serde(default)]
    pub files: FilesConfig,
}

/// Core assistant configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Name the assistant announces itself with
    #[serde(default = "default_assistant_name")]
    pub assistant_name: String,

    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Data directory path (supports ~ expansion)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

/// Capability enablement flags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilitiesConfig {
    #[serde(default = "default_true")]
    pub weather: bool,

    #[serde(default = "default_true")]
    pub news: bool,

    #[serde(default = "default_true")]
    pub knowledge: bool,

    #[serde(default)]
    pub smart_home: bool,

    #[serde(default = "default_true")]
    pub system_monitor: bool,

    /// App launch and power actions
    #[serde(default)]
    pub process_control: bool,

    #[serde(default = "default_true")]
    pub files: bool,

    #[serde(default)]
    pub screen: bool,
}

impl Default for CapabilitiesConfig {
    fn default() -> Self {
        Self {
            weather: true,
            news: true,
            knowledge: true,
            smart_home: false,
            system_monitor: true,
            process_control: false,
            files: true,
            screen: false,
        }
    }
}

/// Weather service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// API key; falls back to ARIA_WEATHER_API_KEY
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_weather_base_url")]
    pub base_url: String,

    #[serde(default = "default_weather_timeout")]
    pub timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
            timeout_secs: default_weather_timeout(),
        }
    }
}

/// News service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    /// API key; falls back to ARIA_NEWS_API_KEY
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_news_base_url")]
    pub base_url: String,

    /// Two-letter country code for top headlines
    #[serde(default = "default_news_country")]
    pub country: String,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_news_base_url(),
            country: default_news_country(),
        }
    }
}

/// Knowledge service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    #[serde(default = "default_knowledge_base_url")]
    pub base_url: String,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            base_url: default_knowledge_base_url(),
        }
    }
}

/// Smart home bridge configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SmartHomeConfig {
    /// Bridge base URL, e.g. http://192.168.1.10
    #[serde(default)]
    pub host: String,

    /// Bridge API username
    #[serde(default)]
    pub username: String,

    /// Spoken device name to numeric light id
    #[serde(default)]
    pub devices: HashMap<String, u8>,
}

/// File access configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    /// Root directory for file-name searches (supports ~ expansion)
    #[serde(default = "default_search_root")]
    pub search_root: PathBuf,

    /// Directories probed when opening a bare filename, in order
    #[serde(default = "default_common_dirs")]
    pub common_dirs: Vec<PathBuf>,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            search_root: default_search_root(),
            common_dirs: default_common_dirs(),
        }
    }
}

// Default value functions
fn default_assistant_name() -> String {
    "Aria".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("~/.aria")
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_weather_timeout() -> u64 {
    10
}

fn default_news_base_url() -> String {
    "https://newsapi.org/v2".to_string()
}

fn default_news_country() -> String {
    "us".to_string()
}

fn default_knowledge_base_url() -> String {
    "https://en.wikipedia.org/api/rest_v1".to_string()
}

fn default_search_root() -> PathBuf {
    PathBuf::from("~")
}

fn default_common_dirs() -> Vec<PathBuf> {
    vec![
        PathBuf::from("~/Documents"),
        PathBuf::from("~/Downloads"),
        PathBuf::from("~/Desktop"),
    ]
}

impl Config {
    /// Load configuration from the default location (~/.aria/config.toml),
    /// creating a default file if none exists.
    pub fn load_or_create() -> Result<Self, AssistantError> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            Self::create_default(&config_path)
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, AssistantError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| AssistantError::Config(format!("Failed to read config file: {}", e)))?;

        let mut config: Config = toml::from_str(&contents)
            .map_err(|e| AssistantError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate_and_process()?;

        Ok(config)
    }

    /// Create default configuration and save to path.
    fn create_default(path: &Path) -> Result<Self, AssistantError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AssistantError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let mut config = Self::default_config();
        config.validate_and_process()?;

        let toml_string = toml::to_string_pretty(&config)
            .map_err(|e| AssistantError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| AssistantError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(config)
    }

    /// Get the default configuration file path (~/.aria/config.toml).
    fn default_config_path() -> Result<PathBuf, AssistantError> {
        let home = dirs::home_dir().ok_or_else(|| {
            AssistantError::Config("Could not determine home directory".to_string())
        })?;

        Ok(home.join(".aria").join("config.toml"))
    }

    fn default_config() -> Self {
        Self {
            core: CoreConfig {
                assistant_name: default_assistant_name(),
                log_level: default_log_level(),
                data_dir: default_data_dir(),
            },
            capabilities: CapabilitiesConfig::default(),
            weather: WeatherConfig::default(),
            news: NewsConfig::default(),
            knowledge: KnowledgeConfig::default(),
            smart_home: SmartHomeConfig::default(),
            files: FilesConfig::default(),
        }
    }

    /// Validate fields, apply environment overrides, expand paths, and
    /// create the data directory if missing.
    fn validate_and_process(&mut self) -> Result<(), AssistantError> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.core.log_level.as_str()) {
            return Err(AssistantError::Config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.core.log_level,
                valid_log_levels.join(", ")
            )));
        }

        if self.core.assistant_name.trim().is_empty() {
            return Err(AssistantError::Config(
                "assistant_name must not be empty".to_string(),
            ));
        }

        if self.news.country.len() != 2 {
            return Err(AssistantError::Config(format!(
                "news country must be a two-letter code, got '{}'",
                self.news.country
            )));
        }

        if self.capabilities.smart_home && self.smart_home.host.is_empty() {
            return Err(AssistantError::Config(
                "smart_home is enabled but no bridge host is configured".to_string(),
            ));
        }

        // Environment overrides for secrets
        if let Ok(key) = std::env::var("ARIA_WEATHER_API_KEY") {
            if !key.is_empty() {
                self.weather.api_key = Some(key);
            }
        }
        if let Ok(key) = std::env::var("ARIA_NEWS_API_KEY") {
            if !key.is_empty() {
                self.news.api_key = Some(key);
            }
        }

        self.core.data_dir = expand_path(&self.core.data_dir)?;
        if !self.core.data_dir.exists() {
            fs::create_dir_all(&self.core.data_dir).map_err(|e| {
                AssistantError::Config(format!("Failed to create data directory: {}", e))
            })?;
        }

        self.files.search_root = expand_path(&self.files.search_root)?;
        self.files.common_dirs = self
            .files
            .common_dirs
            .iter()
            .map(|p| expand_path(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(())
    }
}

/// Expand ~ in path to user's home directory.
fn expand_path(path: &Path) -> Result<PathBuf, AssistantError> {
    let path_str = path
        .to_str()
        .ok_or_else(|| AssistantError::Config("Invalid UTF-8 in path".to_string()))?;

    if let Some(rest) = path_str.strip_prefix("~/") {
        let home = dirs::home_dir().ok_or_else(|| {
            AssistantError::Config("Could not determine home directory".to_string())
        })?;

        Ok(home.join(rest))
    } else if path_str == "~" {
        dirs::home_dir().ok_or_else(|| {
            AssistantError::Config("Could not determine home directory".to_string())
        })
    } else {
        Ok(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_minimal_config_gets_defaults() {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join("data");
        let path = write_config(
            &temp,
            &format!(
                "[core]\ndata_dir = \"{}\"\n",
                data_dir.display()
            ),
        );

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.core.assistant_name, "Aria");
        assert_eq!(config.core.log_level, "info");
        assert!(config.capabilities.weather);
        assert!(!config.capabilities.smart_home);
        assert_eq!(config.news.country, "us");
        assert!(data_dir.is_dir());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            &format!(
                "[core]\nlog_level = \"loud\"\ndata_dir = \"{}\"\n",
                temp.path().join("data").display()
            ),
        );

        let err = Config::load_from_path(&path).unwrap_err();
        assert!(matches!(err, AssistantError::Config(_)));
    }

    #[test]
    fn test_smart_home_requires_host() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            &format!(
                "[core]\ndata_dir = \"{}\"\n\n[capabilities]\nsmart_home = true\n",
                temp.path().join("data").display()
            ),
        );

        let err = Config::load_from_path(&path).unwrap_err();
        assert!(matches!(err, AssistantError::Config(_)));
    }

    #[test]
    fn test_bad_country_code_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            &format!(
                "[core]\ndata_dir = \"{}\"\n\n[news]\ncountry = \"usa\"\n",
                temp.path().join("data").display()
            ),
        );

        let err = Config::load_from_path(&path).unwrap_err();
        assert!(matches!(err, AssistantError::Config(_)));
    }

    #[test]
    fn test_device_registry_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            &format!(
                concat!(
                    "[core]\ndata_dir = \"{}\"\n\n",
                    "[smart_home]\nhost = \"http://bridge\"\nusername = \"aria\"\n\n",
                    "[smart_home.devices]\n\"living room light\" = 3\n\"bedroom light\" = 7\n"
                ),
                temp.path().join("data").display()
            ),
        );

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.smart_home.devices.get("living room light"), Some(&3));
        assert_eq!(config.smart_home.devices.get("bedroom light"), Some(&7));
    }

    #[test]
    fn test_expand_path_passthrough() {
        let expanded = expand_path(Path::new("/tmp/aria")).unwrap();
        assert_eq!(expanded, PathBuf::from("/tmp/aria"));
    }
}
