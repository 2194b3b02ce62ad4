//! Logging setup.
//!
//! Spoken output goes to stdout, so every diagnostic line is written to
//! stderr to keep transcripts clean. `RUST_LOG` overrides the level that
//! config validation approved.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber with a config-validated log level.
///
/// Priority: `RUST_LOG` env var > `log_level` parameter.
///
/// Debug builds get compact human-readable lines; release builds emit
/// JSON so session logs can be collected.
pub fn init_telemetry_with_level(log_level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{},aria_engine={}", log_level, log_level))
    });

    #[cfg(debug_assertions)]
    let format = fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr);

    #[cfg(not(debug_assertions))]
    let format = fmt::layer()
        .json()
        .with_current_span(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(format)
        .try_init()
        .ok();
}

/// Default "info" setup for the window before the config is loaded.
pub fn init_telemetry() {
    init_telemetry_with_level("info");
}
