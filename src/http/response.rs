//! Response envelope shared by every API endpoint.
//!
//! # Design Decisions
//! - Application errors travel in the body, not the transport status: an
//!   error envelope is always sent with `200 OK`. Clients key off `code`.
//! - Codes are 16-bit; messages built from arbitrary codes are masked.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// API error codes carried in the envelope `code` field.
pub mod codes {
    pub const SERVER_OFFLINE: u32 = 0x0100;
    pub const NO_AUTH_INFO: u32 = 0x0105;
    pub const GEN_TAOSD_TOKEN_ERR: u32 = 0x010A;
    pub const INVALID_AUTH_TYPE: u32 = 0x0122;
    pub const INVALID_BASIC_AUTH: u32 = 0x0124;
}

/// Human-readable description for a known code.
pub fn error_message(code: u32) -> Option<&'static str> {
    match code {
        codes::SERVER_OFFLINE => Some("server is not online"),
        codes::NO_AUTH_INFO => Some("no auth info input"),
        codes::GEN_TAOSD_TOKEN_ERR => Some("generate taosd token error"),
        codes::INVALID_AUTH_TYPE => Some("invalid type of Authorization"),
        codes::INVALID_BASIC_AUTH => Some("invalid basic Authorization"),
        _ => None,
    }
}

/// `{"status": ..., "code": ..., "desc": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    pub status: String,
    pub code: u32,
    pub desc: String,
}

impl ApiMessage {
    /// Success envelope carrying `desc` as payload.
    pub fn success(desc: impl Into<String>) -> Self {
        Self {
            status: "succ".to_string(),
            code: 0,
            desc: desc.into(),
        }
    }

    /// Error envelope with the registered description for `code`.
    pub fn error(code: u32) -> Self {
        Self {
            status: "error".to_string(),
            code,
            desc: error_message(code).unwrap_or("unknown error").to_string(),
        }
    }

    /// Error envelope with a caller-supplied description.
    pub fn error_with_message(code: u32, msg: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            code: code & 0xffff,
            desc: msg.into(),
        }
    }
}

impl IntoResponse for ApiMessage {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
