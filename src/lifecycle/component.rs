//! Lifecycle contract for long-running subsystems (REST layer, plugin set).

use async_trait::async_trait;
use axum::Router;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComponentError {
    #[error("{component} failed to start: {reason}")]
    Start { component: String, reason: String },

    #[error("{component} failed to stop: {reason}")]
    Stop { component: String, reason: String },

    #[error("plugin '{0}' is already registered")]
    DuplicatePlugin(String),
}

/// A subsystem started once before traffic is accepted and stopped once at
/// shutdown. `stop` carries no completion deadline; callers bound it.
#[async_trait]
pub trait Component: Send + Sync {
    fn name(&self) -> &str;

    /// Mount the component's routes.
    fn init(&self, router: Router) -> Router {
        router
    }

    async fn start(&self) -> Result<(), ComponentError> {
        Ok(())
    }

    async fn stop(&self) -> Result<(), ComponentError>;
}
