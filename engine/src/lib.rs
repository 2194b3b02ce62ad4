//! Aria Engine Library
//!
//! This library provides the core functionality of the Aria assistant.
//! It is used by both the main binary and integration tests.

/// Configuration management module
pub mod config;

/// Intent routing module
pub mod intent;

/// Arithmetic expression evaluator
pub mod calc;

/// Unit conversion module
pub mod units;

/// Reminder and task scheduling module
pub mod scheduler;

/// Capability implementations and registry
pub mod capabilities;

/// Interpreter loop core module
pub mod assistant;

/// Telemetry and Observability
pub mod telemetry;

/// CLI interface module
pub mod cli;

/// Command handlers module
pub mod handlers;
