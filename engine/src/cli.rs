//! CLI interface for Aria
//!
//! This module provides the command-line interface using clap's derive API.
//! It defines all commands and global flags for the assistant.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Aria Voice Assistant Engine
///
/// A local command interpreter that routes spoken or typed requests to
/// capabilities: lookups, a calculator, unit conversion, reminders, and
/// system control.
#[derive(Parser, Debug)]
#[command(name = "aria")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log: Option<String>,

    /// Specify alternate configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the interactive session
    Listen,

    /// Interpret a single utterance and exit
    Run {
        /// The utterance to interpret
        utterance: String,
    },

    /// Run configuration and capability diagnostics
    Doctor,
}
