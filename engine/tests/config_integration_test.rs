//! Integration tests for configuration loading
//!
//! Exercises the full load path: TOML parsing, defaults, validation, and
//! data directory creation.

use std::fs;
use tempfile::TempDir;

use aria_engine::config::Config;

fn write_config(temp: &TempDir, body: &str) -> std::path::PathBuf {
    let path = temp.path().join("config.toml");
    let data_dir = temp.path().join("data");
    fs::write(
        &path,
        format!("[core]\ndata_dir = \"{}\"\n{}", data_dir.display(), body),
    )
    .unwrap();
    path
}

#[test]
fn test_full_config_round_trips_through_toml() {
    let temp = TempDir::new().unwrap();
    let path = write_config(
        &temp,
        r#"
assistant_name = "Jarvis"
log_level = "debug"

[capabilities]
weather = true
smart_home = true
screen = true

[weather]
api_key = "abc123"
timeout_secs = 20

[news]
api_key = "def456"
country = "gb"

[smart_home]
host = "http://192.168.1.10"
username = "aria"

[smart_home.devices]
"desk lamp" = 4
"#,
    );

    let config = Config::load_from_path(&path).unwrap();

    assert_eq!(config.core.assistant_name, "Jarvis");
    assert_eq!(config.core.log_level, "debug");
    assert!(config.capabilities.smart_home);
    assert!(config.capabilities.screen);
    assert_eq!(config.weather.api_key.as_deref(), Some("abc123"));
    assert_eq!(config.weather.timeout_secs, 20);
    assert_eq!(config.news.country, "gb");
    assert_eq!(config.smart_home.host, "http://192.168.1.10");
    assert_eq!(config.smart_home.devices.get("desk lamp"), Some(&4));

    // Serializing and reloading reproduces the same values.
    let serialized = toml::to_string_pretty(&config).unwrap();
    let reparsed: Config = toml::from_str(&serialized).unwrap();
    assert_eq!(reparsed.core.assistant_name, config.core.assistant_name);
    assert_eq!(reparsed.weather.timeout_secs, config.weather.timeout_secs);
    assert_eq!(
        reparsed.smart_home.devices.get("desk lamp"),
        config.smart_home.devices.get("desk lamp")
    );
}

#[test]
fn test_data_dir_is_created_on_load() {
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, "");
    let data_dir = temp.path().join("data");
    assert!(!data_dir.exists());

    Config::load_from_path(&path).unwrap();
    assert!(data_dir.is_dir());
}

#[test]
fn test_defaults_fill_missing_sections() {
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, "");

    let config = Config::load_from_path(&path).unwrap();

    assert_eq!(config.core.assistant_name, "Aria");
    assert!(config.weather.base_url.contains("openweathermap"));
    assert!(config.knowledge.base_url.contains("wikipedia"));
    assert!(config.capabilities.files);
    assert!(!config.capabilities.process_control);
    assert!(!config.files.common_dirs.is_empty());
}

#[test]
fn test_malformed_toml_is_a_config_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, "this is not toml [[[").unwrap();

    assert!(Config::load_from_path(&path).is_err());
}

#[test]
fn test_missing_file_is_a_config_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nope.toml");
    assert!(Config::load_from_path(&path).is_err());
}
