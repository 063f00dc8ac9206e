//! Startup orchestration.
//!
//! # Responsibilities
//! - Mount every component's routes on the application router
//! - Start components in order before the listener binds
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Components start in order, not concurrently
//! - Listeners start last (traffic only when ready)

use std::sync::Arc;

use axum::Router;
use thiserror::Error;

use crate::config::ConfigError;
use crate::lifecycle::component::{Component, ComponentError};
use crate::observability::logging::LoggingError;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error(transparent)]
    Component(#[from] ComponentError),

    #[error("invalid bind address '{address}': {source}")]
    InvalidAddress {
        address: String,
        source: std::net::AddrParseError,
    },

    #[error("failed to load TLS material: {0}")]
    Tls(std::io::Error),

    #[error("failed to bind listener: {0}")]
    Bind(std::io::Error),
}

/// Initialize and start `components`, returning the router with their routes.
pub async fn start_components(
    router: Router,
    components: &[Arc<dyn Component>],
) -> Result<Router, StartupError> {
    let router = components.iter().fold(router, |router, component| {
        tracing::debug!(component = component.name(), "Mounting routes");
        component.init(router)
    });

    for component in components {
        component.start().await?;
        tracing::info!(component = component.name(), "Component started");
    }

    Ok(router)
}
