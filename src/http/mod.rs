//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (axum-server listener, middleware stack)
//!     → request.rs (request ID)
//!     → middleware/auth.rs (Authorization → RequestIdentity, or error envelope)
//!     → REST / plugin handlers
//!     → response.rs (status/code/desc envelope)
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use response::ApiMessage;
pub use server::{build_router, HttpServer, ServerHandle};
