//! Tracing subscriber setup
//!
//! `RUST_LOG` wins over the configured filter when set.

use crate::config::LoggingConfig;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines for local runs
    Human,
    /// Newline-delimited JSON
    Json,
}

impl LogFormat {
    /// Parse the `logging.format` setting; anything but `human` means JSON
    pub fn from_setting(value: &str) -> Self {
        if value.eq_ignore_ascii_case("human") {
            LogFormat::Human
        } else {
            LogFormat::Json
        }
    }
}

/// Install the global subscriber
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match LogFormat::from_setting(&config.format) {
        LogFormat::Human => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true))
            .try_init(),
    }
}
