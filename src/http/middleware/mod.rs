pub mod auth;
pub mod metrics;

pub use self::auth::auth_middleware;
pub use self::metrics::track_requests;
