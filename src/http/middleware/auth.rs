//! Authentication middleware.
//! Resolves the `Authorization` header and attaches the caller's identity.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::warn;

use crate::auth::{authenticate, CredentialCodec};
use crate::http::response::ApiMessage;
use crate::observability::metrics;

pub async fn auth_middleware(
    State(codec): State<Arc<CredentialCodec>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());

    match authenticate(header.as_deref(), &codec) {
        Ok(identity) => {
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        Err(err) => {
            warn!(
                path = %req.uri().path(),
                code = err.code(),
                error = %err,
                "Request rejected"
            );
            metrics::record_auth_rejection(err.code());
            ApiMessage::error(err.code()).into_response()
        }
    }
}
