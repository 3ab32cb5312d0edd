//! Initialization of the tracing subscriber.

use once_cell::sync::Lazy;
use std::env;
use tracing::metadata::LevelFilter;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Layer;
use tracing_subscriber::Registry;

const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::INFO;

const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

static LOG_LEVEL: Lazy<LevelFilter> = Lazy::new(|| match env::var(ENV_LOG_LEVEL) {
    Ok(level) => level.parse().unwrap_or_else(|_| {
        eprintln!("unknown log level {level}, using {DEFAULT_LOG_LEVEL}");
        DEFAULT_LOG_LEVEL
    }),
    Err(_) => DEFAULT_LOG_LEVEL,
});

/// Installs a pretty stdout subscriber filtered by the `LOG_LEVEL` environment variable.
pub fn init() -> Result<(), SetGlobalDefaultError> {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();
    let subscriber = Registry::default().with(stdout_log.with_filter(*LOG_LEVEL));

    tracing::subscriber::set_global_default(subscriber)
}
