//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Mount component routes → Start components → Start listener
//!
//! Shutdown (shutdown.rs):
//!     Terminate → { drain HTTP listener ∥ stop components } raced against a ceiling → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then components, then listeners
//! - Shutdown has a hard ceiling: the process never waits on teardown past it

pub mod component;
pub mod shutdown;
pub mod signals;
pub mod startup;

pub use component::{Component, ComponentError};
pub use shutdown::{Drain, Shutdown, ShutdownOrchestrator, ShutdownState};
pub use startup::{start_components, StartupError};
