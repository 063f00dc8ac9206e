//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Pure function: AdapterConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use axum::http::{HeaderName, HeaderValue};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::schema::AdapterConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

pub fn validate_config(config: &AdapterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    let tls = &config.listener.tls;
    if tls.enabled && (tls.cert_path.is_empty() || tls.key_path.is_empty()) {
        errors.push(ValidationError::new(
            "listener.tls",
            "cert_path and key_path are required when TLS is enabled",
        ));
    }

    for (field, secs) in [
        ("timeouts.request_secs", config.timeouts.request_secs),
        ("timeouts.header_read_secs", config.timeouts.header_read_secs),
        ("shutdown.drain_timeout_secs", config.shutdown.drain_timeout_secs),
        ("shutdown.stop_timeout_secs", config.shutdown.stop_timeout_secs),
    ] {
        if secs == 0 {
            errors.push(ValidationError::new(field, "must be greater than zero"));
        }
    }

    if let Err(e) = EnvFilter::try_new(&config.log.level) {
        errors.push(ValidationError::new("log.level", e.to_string()));
    }

    for origin in &config.cors.allow_origins {
        if origin == "*" || HeaderValue::from_str(origin).is_err() {
            errors.push(ValidationError::new(
                "cors.allow_origins",
                format!("'{origin}' is not a valid origin (use allow_all_origins for '*')"),
            ));
        }
    }

    for header in &config.cors.allow_headers {
        if HeaderName::from_bytes(header.as_bytes()).is_err() {
            errors.push(ValidationError::new(
                "cors.allow_headers",
                format!("'{header}' is not a valid header name"),
            ));
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&AdapterConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = AdapterConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.listener.tls.enabled = true;
        config.shutdown.stop_timeout_secs = 0;
        config.cors.allow_headers.push("bad header".into());

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "listener.tls",
                "shutdown.stop_timeout_secs",
                "cors.allow_headers",
            ]
        );
    }

    #[test]
    fn metrics_address_checked_only_when_enabled() {
        let mut config = AdapterConfig::default();
        config.observability.metrics_address = "bogus".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
