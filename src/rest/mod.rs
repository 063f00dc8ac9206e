//! REST layer.
//!
//! Mounts `/rest/*` behind the authentication middleware. Query execution
//! lives in downstream handlers; this layer owns the routing shell, the
//! identity plumbing and the open/closed state used during shutdown.

use async_trait::async_trait;
use axum::{
    extract::State,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Router,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::auth::{CredentialCodec, RequestIdentity};
use crate::http::middleware::auth_middleware;
use crate::http::response::{codes, ApiMessage};
use crate::lifecycle::{Component, ComponentError};

pub struct RestLayer {
    codec: Arc<CredentialCodec>,
    closed: Arc<AtomicBool>,
}

impl RestLayer {
    pub fn new(codec: Arc<CredentialCodec>) -> Self {
        Self {
            codec,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/rest/login", get(login))
            .route_layer(middleware::from_fn_with_state(
                self.codec.clone(),
                auth_middleware,
            ))
            .with_state(self.closed.clone())
    }
}

#[async_trait]
impl Component for RestLayer {
    fn name(&self) -> &str {
        "rest"
    }

    fn init(&self, router: Router) -> Router {
        router.merge(self.routes())
    }

    async fn stop(&self) -> Result<(), ComponentError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Echo the authenticated user.
async fn login(
    State(closed): State<Arc<AtomicBool>>,
    Extension(identity): Extension<RequestIdentity>,
) -> Response {
    if closed.load(Ordering::SeqCst) {
        return ApiMessage::error(codes::SERVER_OFFLINE).into_response();
    }
    ApiMessage::success(identity.user).into_response()
}
