//! Shared data types for capability collaborators

use serde::{Deserialize, Serialize};

/// Current-weather report for a city
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReport {
    /// City the report is for (echoed from the query)
    pub city: String,
    /// Temperature in degrees Celsius
    pub temperature: f64,
    /// Perceived temperature in degrees Celsius
    pub feels_like: f64,
    /// Relative humidity in percent
    pub humidity: u8,
    /// Short text description ("scattered clouds")
    pub description: String,
}

impl WeatherReport {
    /// Render the report as a spoken sentence.
    pub fn spoken(&self) -> String {
        format!(
            "The temperature in {} is {} degrees Celsius, feels like {} degrees, \
             with {} and humidity is {} percent",
            self.city, self.temperature, self.feels_like, self.description, self.humidity
        )
    }
}

/// A single news headline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Headline {
    pub title: String,
    #[serde(default)]
    pub source: Option<String>,
}

/// Snapshot of host resource usage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemSnapshot {
    /// CPU usage in percent, averaged over a short sample window
    pub cpu_percent: f32,
    /// Used memory in percent of total
    pub memory_percent: f32,
    /// Battery level in percent, if the host has a battery
    pub battery_percent: Option<u8>,
}

impl SystemSnapshot {
    /// Render the snapshot as a spoken sentence.
    pub fn spoken(&self) -> String {
        let battery = match self.battery_percent {
            Some(pct) => format!("{} percent", pct),
            None => "unknown".to_string(),
        };
        format!(
            "CPU usage is {:.0} percent, memory usage is {:.0} percent, battery level is {}",
            self.cpu_percent, self.memory_percent, battery
        )
    }
}

/// System applications the assistant knows how to launch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SystemApp {
    /// Plain text editor (notepad / TextEdit / gedit)
    Editor,
    /// Desktop calculator
    Calculator,
    /// Terminal emulator / command prompt
    Terminal,
}

impl SystemApp {
    /// Name used when speaking about the app.
    pub fn spoken_name(&self) -> &'static str {
        match self {
            Self::Editor => "notepad",
            Self::Calculator => "calculator",
            Self::Terminal => "command prompt",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_report_spoken() {
        let report = WeatherReport {
            city: "london".to_string(),
            temperature: 18.5,
            feels_like: 17.0,
            humidity: 72,
            description: "light rain".to_string(),
        };
        let spoken = report.spoken();
        assert!(spoken.contains("london"));
        assert!(spoken.contains("18.5 degrees"));
        assert!(spoken.contains("light rain"));
        assert!(spoken.contains("72 percent"));
    }

    #[test]
    fn test_snapshot_without_battery() {
        let snap = SystemSnapshot {
            cpu_percent: 12.4,
            memory_percent: 55.8,
            battery_percent: None,
        };
        assert!(snap.spoken().contains("battery level is unknown"));
    }

    #[test]
    fn test_system_app_names() {
        assert_eq!(SystemApp::Editor.spoken_name(), "notepad");
        assert_eq!(SystemApp::Terminal.spoken_name(), "command prompt");
    }
}
