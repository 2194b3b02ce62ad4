//! Capability implementations and the registry that holds them.
//!
//! Each submodule provides a concrete implementation of one of the SDK
//! capability traits. The registry is assembled once at startup from the
//! config's enable flags; handlers check for `Some` and answer with an
//! unavailability hint when a capability is absent.

pub mod files;
pub mod knowledge;
pub mod news;
pub mod smart_home;
pub mod speech;
pub mod system;
pub mod weather;

pub use files::FileManager;
pub use knowledge::WikipediaClient;
pub use news::NewsApiClient;
pub use smart_home::HueBridge;
pub use speech::{ConsoleCapture, ConsoleSpeech};
pub use system::{PlatformControl, ScreenshotTool, SysinfoMonitor};
pub use weather::OpenWeatherClient;

use sdk::capability::{
    FileAccess, KnowledgeLookup, NewsLookup, ProcessControl, ScreenCapture, SmartHomeBridge,
    SystemMonitor, WeatherLookup,
};

/// Registry of the capabilities a session has available.
///
/// Only capabilities that are `Some` can be reached by handlers; everything
/// else produces a spoken unavailability message instead of an error.
pub struct CapabilityRegistry {
    pub weather: Option<Box<dyn WeatherLookup>>,
    pub news: Option<Box<dyn NewsLookup>>,
    pub knowledge: Option<Box<dyn KnowledgeLookup>>,
    pub smart_home: Option<Box<dyn SmartHomeBridge>>,
    pub monitor: Option<Box<dyn SystemMonitor>>,
    pub process: Option<Box<dyn ProcessControl>>,
    pub files: Option<Box<dyn FileAccess>>,
    pub screen: Option<Box<dyn ScreenCapture>>,
}

impl CapabilityRegistry {
    /// Create an empty registry with no capabilities enabled.
    pub fn empty() -> Self {
        Self {
            weather: None,
            news: None,
            knowledge: None,
            smart_home: None,
            monitor: None,
            process: None,
            files: None,
            screen: None,
        }
    }

    /// Names of the enabled capabilities, for diagnostics output.
    pub fn enabled_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.weather.is_some() {
            names.push("weather");
        }
        if self.news.is_some() {
            names.push("news");
        }
        if self.knowledge.is_some() {
            names.push("knowledge");
        }
        if self.smart_home.is_some() {
            names.push("smart_home");
        }
        if self.monitor.is_some() {
            names.push("system_monitor");
        }
        if self.process.is_some() {
            names.push("process_control");
        }
        if self.files.is_some() {
            names.push("files");
        }
        if self.screen.is_some() {
            names.push("screen");
        }
        names
    }
}
