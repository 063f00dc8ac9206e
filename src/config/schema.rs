//! Configuration schema definitions.
//!
//! All sections use `#[serde(default)]` so a partial (or empty) TOML file is
//! a valid configuration.

use serde::{Deserialize, Serialize};

/// Root configuration for the adapter.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AdapterConfig {
    /// Enables debug-level defaults.
    pub debug: bool,

    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Timeout configuration for request handling.
    pub timeouts: TimeoutConfig,

    /// Shutdown deadlines.
    pub shutdown: ShutdownConfig,

    /// Log output settings.
    pub log: LogConfig,

    /// Cross-origin policy.
    pub cors: CorsConfig,

    /// Response compression.
    pub compression: CompressionConfig,

    /// Metrics exporter settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:6041").
    pub bind_address: String,

    /// TLS settings; plain HTTP unless `enabled`.
    pub tls: TlsConfig,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:6041".to_string(),
            tls: TlsConfig::default(),
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TlsConfig {
    pub enabled: bool,

    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,

    /// Time a client gets to send the complete request head, in seconds.
    pub header_read_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            header_read_secs: 20,
        }
    }
}

/// Shutdown deadlines. Both timers start when the terminate event arrives
/// and run independently.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// Deadline for in-flight HTTP requests before connections are closed.
    pub drain_timeout_secs: u64,

    /// Ceiling on the whole shutdown; outstanding component teardown is
    /// abandoned after it.
    pub stop_timeout_secs: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            drain_timeout_secs: 5,
            stop_timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive (trace, debug, info, warn, error, or per-target).
    pub level: String,

    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Accept any origin; `allow_origins` is ignored when set.
    pub allow_all_origins: bool,

    pub allow_origins: Vec<String>,

    /// Extra request headers allowed on top of the defaults.
    pub allow_headers: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_all_origins: true,
            allow_origins: Vec::new(),
            allow_headers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CompressionConfig {
    pub gzip: bool,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
