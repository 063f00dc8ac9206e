//! Network layer subsystem.
//!
//! # Design Decisions
//! - TLS is optional and handled transparently by the listener
//! - Connection tracking and draining live in the `axum-server` handle

pub mod tls;
