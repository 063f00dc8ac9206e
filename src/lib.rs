//! HTTP adapter front end.
//!
//! Authenticates requests with `Basic` or `Taosd` credentials and shuts down
//! within a bounded grace period while coordinating the REST layer and the
//! plugin set.

pub mod admin;
pub mod auth;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod plugin;
pub mod rest;

pub use auth::{CredentialCodec, RequestIdentity};
pub use config::schema::AdapterConfig;
pub use http::HttpServer;
pub use lifecycle::{Shutdown, ShutdownOrchestrator, ShutdownState};
