//! HTTP Basic credential decoding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BasicAuthError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("credentials are not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("missing ':' separator")]
    MissingSeparator,
}

/// Decode `base64(user:password)`. The split happens at the first `:`, so
/// passwords may contain colons.
pub fn decode_basic(encoded: &str) -> Result<(String, String), BasicAuthError> {
    let decoded = String::from_utf8(STANDARD.decode(encoded)?)?;
    let (user, password) = decoded
        .split_once(':')
        .ok_or(BasicAuthError::MissingSeparator)?;
    Ok((user.to_string(), password.to_string()))
}
