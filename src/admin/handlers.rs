use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::admin::AdminState;
use crate::http::response::{codes, ApiMessage};

/// `POST /logModel`: body is the new filter directive.
pub async fn set_log_level(State(state): State<AdminState>, body: String) -> Response {
    let Some(handle) = state.log_level.as_ref() else {
        return (StatusCode::BAD_REQUEST, "log level control unavailable").into_response();
    };

    match handle.set_level(&body) {
        Ok(()) => (StatusCode::OK, body).into_response(),
        Err(e) => {
            tracing::warn!(directive = %body.trim(), error = %e, "Rejected log level change");
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

/// `GET /genauth/{user}/{password}`: issue a `Taosd` token.
pub async fn generate_token(
    State(state): State<AdminState>,
    Path((user, password)): Path<(String, String)>,
) -> ApiMessage {
    match state.codec.encode(&user, &password) {
        Ok(token) => ApiMessage::success(token),
        Err(e) => {
            tracing::debug!(user = %user, error = %e, "Token generation failed");
            ApiMessage::error(codes::GEN_TAOSD_TOKEN_ERR)
        }
    }
}
