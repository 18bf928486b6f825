use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Overrides every other level setting when present.
pub const LOG_ENV: &str = "SURVEYS_LOG";

/// Install the global subscriber. `-v` flags raise the configured level.
pub fn init(config: &LoggingConfig, verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => config.level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).or_else(|_| EnvFilter::try_new(level))?;

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_timer(fmt::time::UtcTime::rfc_3339()),
            )
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_timer(fmt::time::UtcTime::rfc_3339()))
            .try_init()
    };
    installed.context("failed to install tracing subscriber")
}
