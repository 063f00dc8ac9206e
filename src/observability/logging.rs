//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber (pretty or JSON output)
//! - Keep a reload handle so the filter can be changed at runtime
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level at startup
//! - Runtime changes replace the whole filter directive

use thiserror::Error;
use tracing_subscriber::{
    filter::ParseError, layer::SubscriberExt, reload, util::SubscriberInitExt,
    util::TryInitError, EnvFilter, Registry,
};

use crate::config::schema::{LogConfig, LogFormat};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),

    #[error("failed to swap log filter: {0}")]
    Reload(#[from] reload::Error),

    #[error("failed to install subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// Handle for changing the active log filter.
#[derive(Clone)]
pub struct LogLevelHandle {
    inner: reload::Handle<EnvFilter, Registry>,
}

impl LogLevelHandle {
    /// Replace the active filter with `directive` (e.g. `debug`, `blm_adapter=trace`).
    pub fn set_level(&self, directive: &str) -> Result<(), LoggingError> {
        let filter = EnvFilter::try_new(directive.trim())?;
        self.inner.reload(filter)?;
        tracing::info!(filter = %directive.trim(), "Log filter updated");
        Ok(())
    }
}

/// Install the global subscriber.
pub fn init_logging(config: &LogConfig) -> Result<LogLevelHandle, LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)?,
    };
    let (filter, handle) = reload::Layer::new(filter);

    let json = config.format == LogFormat::Json;
    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .try_init()?;

    Ok(LogLevelHandle { inner: handle })
}
