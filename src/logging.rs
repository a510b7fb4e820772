//! Console logging through `tracing`. `RUST_LOG` overrides the default filter.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::defaults::DEFAULT_LOG_FILTER;

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub default_filter: String,
    /// Adds file/line to every event.
    pub include_location: bool,
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default_filter: DEFAULT_LOG_FILTER.to_string(),
            include_location: cfg!(debug_assertions),
            ansi: true,
        }
    }
}

pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.default_filter))
}

/// Installs the global subscriber. Fails when one is already set.
pub fn init(config: LoggingConfig) -> anyhow::Result<()> {
    let layer = fmt::layer()
        .with_target(true)
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_ansi(config.ansi);

    tracing_subscriber::registry()
        .with(env_filter(&config))
        .with(layer)
        .try_init()?;

    tracing::info!(filter = %config.default_filter, "logging initialized");
    Ok(())
}

pub fn init_default() -> anyhow::Result<()> {
    init(LoggingConfig::default())
}
