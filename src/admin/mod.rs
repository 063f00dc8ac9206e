//! Operational endpoints: runtime log level and `Taosd` token issuance.

pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::auth::CredentialCodec;
use crate::observability::logging::LogLevelHandle;
use self::handlers::*;

#[derive(Clone)]
pub struct AdminState {
    pub codec: Arc<CredentialCodec>,
    /// `None` when no reloadable subscriber is installed (tests, embedding).
    pub log_level: Option<LogLevelHandle>,
}

pub fn setup_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/logModel", post(set_log_level))
        .route("/genauth/{user}/{password}", get(generate_token))
        .with_state(state)
}
