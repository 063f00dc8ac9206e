//! Authorization header dispatch.
//!
//! # State Machine
//! ```text
//! header absent                → NoAuthInfo
//! trim → starts with "Basic"   → base64(user:password)   ─┐
//!      → starts with "Taosd"   → CredentialCodec::decode ─┼→ empty field? → InvalidBasicAuth
//!      → anything else         → InvalidAuthType          │
//!                                                         └→ RequestIdentity
//! ```
//!
//! Prefix matching is case-sensitive. Every decode failure of either scheme
//! reports `InvalidBasicAuth`.

use thiserror::Error;

use crate::auth::basic::decode_basic;
use crate::auth::codec::CredentialCodec;
use crate::http::response::codes;

/// Bytes skipped after a matched prefix: the scheme token plus one delimiter.
const SCHEME_TOKEN_LEN: usize = 6;

/// Supported authorization schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    Basic,
    Taosd,
}

impl AuthScheme {
    pub fn prefix(self) -> &'static str {
        match self {
            AuthScheme::Basic => "Basic",
            AuthScheme::Taosd => "Taosd",
        }
    }

    /// Select the scheme for a trimmed header value.
    pub fn detect(header: &str) -> Option<Self> {
        [AuthScheme::Basic, AuthScheme::Taosd]
            .into_iter()
            .find(|scheme| header.starts_with(scheme.prefix()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("no auth info input")]
    NoAuthInfo,

    #[error("invalid type of Authorization")]
    InvalidAuthType,

    #[error("invalid basic Authorization")]
    InvalidBasicAuth,
}

impl AuthError {
    /// Envelope code reported to the client.
    pub fn code(self) -> u32 {
        match self {
            AuthError::NoAuthInfo => codes::NO_AUTH_INFO,
            AuthError::InvalidAuthType => codes::INVALID_AUTH_TYPE,
            AuthError::InvalidBasicAuth => codes::INVALID_BASIC_AUTH,
        }
    }
}

/// Identity attached to an authenticated request.
#[derive(Clone, PartialEq, Eq)]
pub struct RequestIdentity {
    pub user: String,
    pub password: String,
}

impl std::fmt::Debug for RequestIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestIdentity")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Resolve an `Authorization` header value into a request identity.
pub fn authenticate(
    header: Option<&str>,
    codec: &CredentialCodec,
) -> Result<RequestIdentity, AuthError> {
    let header = match header {
        Some(h) if !h.is_empty() => h.trim(),
        _ => return Err(AuthError::NoAuthInfo),
    };

    let scheme = AuthScheme::detect(header).ok_or(AuthError::InvalidAuthType)?;
    let credential = header
        .get(SCHEME_TOKEN_LEN..)
        .ok_or(AuthError::InvalidBasicAuth)?;

    let (user, password) = match scheme {
        AuthScheme::Basic => decode_basic(credential).map_err(|e| {
            tracing::debug!(error = %e, "Basic credential rejected");
            AuthError::InvalidBasicAuth
        })?,
        AuthScheme::Taosd => codec.decode(credential).map_err(|e| {
            tracing::debug!(error = %e, "Taosd credential rejected");
            AuthError::InvalidBasicAuth
        })?,
    };

    if user.is_empty() || password.is_empty() {
        return Err(AuthError::InvalidBasicAuth);
    }

    Ok(RequestIdentity { user, password })
}
