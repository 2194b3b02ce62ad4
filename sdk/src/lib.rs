//! Aria SDK
//!
//! Shared library providing the capability collaborator traits, error types,
//! and data types used by the Aria engine. Keeping these in their own crate
//! lets alternative front-ends (or test doubles) implement the collaborator
//! contracts without depending on the engine itself.

/// Capability collaborator traits and null implementations
pub mod capability;

/// Error types and handling
pub mod errors;

/// Shared data types
pub mod types;

// Re-export commonly used types
pub use capability::{
    FileAccess, KnowledgeLookup, NewsLookup, NullCapture, NullSpeech, ProcessControl,
    ScreenCapture, SmartHomeBridge, SpeechCapture, SpeechOutput, SystemMonitor, WeatherLookup,
};
pub use errors::{AriaErrorExt, AssistantError};
pub use types::{Headline, SystemApp, SystemSnapshot, WeatherReport};
