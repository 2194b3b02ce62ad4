//! Error types and handling
//!
//! This module provides the error types used throughout the Aria engine.
//! All errors implement the `AriaErrorExt` trait which provides spoken-friendly
//! hints and indicates whether errors are recoverable.
//!
//! Error messages are what the assistant ultimately speaks back to the user,
//! so hints must never contain API keys, raw URLs, or response bodies.

use thiserror::Error;

/// Trait for Aria error extensions
///
/// Provides additional context for errors: a hint phrased so it can be spoken
/// directly to the user, and whether the error is recoverable within the same
/// session. All engine errors implement this trait.
pub trait AriaErrorExt {
    /// Returns a user-friendly hint for the error
    ///
    /// The hint is safe to speak aloud and does not contain:
    /// - Secrets (API keys, tokens)
    /// - Raw URLs or response bodies
    /// - Internal implementation details
    fn user_hint(&self) -> &str;

    /// Returns whether the error is recoverable
    ///
    /// Recoverable errors leave the session usable; the next utterance acts
    /// as the retry. Non-recoverable errors typically mean a capability was
    /// never configured and will keep failing until setup changes.
    fn is_recoverable(&self) -> bool;
}

/// Main assistant error type
///
/// Represents every failure the interpreter loop can observe. Handlers catch
/// these, speak `user_hint()`, and log the full error; nothing propagates out
/// of a loop iteration.
///
/// # Error Categories
///
/// - **Capability**: an optional collaborator was never initialized
/// - **Recognition**: capture returned nothing usable
/// - **External service**: HTTP failure, timeout, malformed response
/// - **Parse / UnsupportedOperation**: expression evaluator failures
/// - **UnsupportedConversion**: unit converter failures
/// - **NotFound / Ambiguous**: lookups with no (or too many) answers
/// - **PermissionDenied**: file-system access
///
/// # Examples
///
/// ```
/// use sdk::errors::{AssistantError, AriaErrorExt};
///
/// let error = AssistantError::CapabilityUnavailable("weather".to_string());
/// println!("Hint: {}", error.user_hint());
/// assert!(!error.is_recoverable());
///
/// let transient = AssistantError::Timeout("weather".to_string());
/// assert!(transient.is_recoverable());
/// ```
#[derive(Debug, Error)]
pub enum AssistantError {
    // Capability errors
    #[error("Capability unavailable: {0}")]
    CapabilityUnavailable(String),

    // Speech recognition errors
    #[error("Recognition failure: {0}")]
    Recognition(String),

    // External service errors
    #[error("External service error ({service}): {detail}")]
    ExternalService { service: String, detail: String },

    #[error("Request to {0} timed out")]
    Timeout(String),

    // Expression evaluator errors
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Division by zero")]
    DivisionByZero,

    // Unit conversion errors
    #[error("Unsupported conversion: {from} to {to}")]
    UnsupportedConversion { from: String, to: String },

    // Lookup errors
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Ambiguous query: {0}")]
    Ambiguous(String),

    // File system errors
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AriaErrorExt for AssistantError {
    fn user_hint(&self) -> &str {
        match self {
            Self::CapabilityUnavailable(_) => {
                "That feature is not available. Check your configuration"
            }

            Self::Recognition(_) => "I could not understand that. Say it again please",

            Self::ExternalService { .. } => "Sorry, I could not reach that service",
            Self::Timeout(_) => "The request took too long. Please try again",

            Self::Parse(_) => "Please give me a valid mathematical expression",
            Self::UnsupportedOperation(_) => "I can only handle basic arithmetic",
            Self::DivisionByZero => "I cannot divide by zero",

            Self::UnsupportedConversion { .. } => {
                "Sorry, I do not know how to convert between those units"
            }

            Self::NotFound(_) => "Sorry, I could not find that",
            Self::Ambiguous(_) => "Multiple results found. Please be more specific",

            Self::PermissionDenied(_) => "Sorry, I do not have permission to access that",

            Self::Config(_) => "Check your config.toml file for errors",

            Self::Io(_) => "A file system operation failed",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            // Will keep failing until the user changes setup
            Self::CapabilityUnavailable(_) | Self::Config(_) => false,

            // Everything else: the next utterance is the retry
            _ => true,
        }
    }
}
