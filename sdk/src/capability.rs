//! Capability collaborator traits
//!
//! Every external capability the assistant core calls (speech, weather, news,
//! knowledge, smart home, files, processes, screen) sits behind one of these
//! narrow traits. Implementations are selected once at startup from explicit
//! configuration; there is no runtime feature probing inside the core. A
//! disabled capability is simply absent from the registry, and its intents
//! are answered with an unavailability message.
//!
//! `NullCapture` and `NullSpeech` exist because the interpreter loop always
//! needs *some* capture and output collaborator, even in a muted session.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::errors::AssistantError;
use crate::types::{Headline, SystemApp, SystemSnapshot, WeatherReport};

/// Convenience alias for capability results
pub type Result<T> = std::result::Result<T, AssistantError>;

/// Obtains one transcribed utterance from the user.
///
/// May block indefinitely; it is the sole long suspension point of the
/// interpreter loop. Returns lower-cased text, or `None` as the
/// empty/failure sentinel (the loop skips the iteration).
#[async_trait]
pub trait SpeechCapture: Send + Sync {
    async fn listen(&self) -> Result<Option<String>>;
}

/// Speaks (or prints) a response to the user.
///
/// Always succeeds from the caller's perspective; implementations absorb
/// and log their own failures.
pub trait SpeechOutput: Send + Sync {
    fn say(&self, text: &str);
}

/// Current-weather lookup for a city.
#[async_trait]
pub trait WeatherLookup: Send + Sync {
    async fn fetch(&self, city: &str) -> Result<WeatherReport>;
}

/// Top-headlines lookup.
#[async_trait]
pub trait NewsLookup: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Headline>>;
}

/// Encyclopedia topic summarization.
#[async_trait]
pub trait KnowledgeLookup: Send + Sync {
    async fn summarize(&self, topic: &str) -> Result<String>;
}

/// Smart-home light bridge.
///
/// Device names are resolved to ids by the caller from the static config
/// registry; the bridge only ever sees numeric ids.
#[async_trait]
pub trait SmartHomeBridge: Send + Sync {
    async fn set_light(&self, device_id: u8, on: bool) -> Result<()>;

    /// Set brightness, 0..=255. Implementations may assume the caller has
    /// already clamped the value.
    async fn set_brightness(&self, device_id: u8, level: u8) -> Result<()>;
}

/// Host resource usage snapshot.
pub trait SystemMonitor: Send + Sync {
    fn snapshot(&self) -> Result<SystemSnapshot>;
}

/// Platform process control: app launch and power actions.
///
/// All calls are fire-and-forget; shutdown/restart confirmation happens in
/// the handler, not here.
#[async_trait]
pub trait ProcessControl: Send + Sync {
    async fn open_app(&self, app: SystemApp) -> Result<()>;
    async fn shutdown(&self) -> Result<()>;
    async fn restart(&self) -> Result<()>;
}

/// File-system search/open/list.
#[async_trait]
pub trait FileAccess: Send + Sync {
    /// Search for files whose name contains `keyword` under `root`.
    /// Implementations stop after 10 hits.
    async fn search_by_name(&self, keyword: &str, root: &Path) -> Result<Vec<PathBuf>>;

    /// Open a file with the platform default application. Returns the path
    /// that was actually opened (after any fallback probing).
    async fn open(&self, path: &str) -> Result<PathBuf>;

    /// List entry names of a directory.
    async fn list(&self, path: &Path) -> Result<Vec<String>>;
}

/// Screen capture to an image file.
#[async_trait]
pub trait ScreenCapture: Send + Sync {
    async fn capture(&self, output: &Path) -> Result<PathBuf>;
}

/// Capture that never hears anything. Stands in when speech input is
/// disabled so the loop logic stays uniform.
pub struct NullCapture;

#[async_trait]
impl SpeechCapture for NullCapture {
    async fn listen(&self) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Output that swallows everything (muted session).
pub struct NullSpeech;

impl SpeechOutput for NullSpeech {
    fn say(&self, _text: &str) {}
}
