//! Request authentication subsystem.
//!
//! # Data Flow
//! ```text
//! Authorization header
//!     → dispatcher.rs (pick scheme by prefix)
//!     → basic.rs  ("Basic": base64 user:password)
//!     → codec.rs  ("Taosd": 48-byte DES block)
//!     → RequestIdentity (attached to the request by the HTTP middleware)
//! ```
//!
//! # Design Decisions
//! - Stateless: the only shared value is the codec's immutable key
//! - All decode failures collapse into one client-facing code

pub mod basic;
pub mod codec;
pub mod dispatcher;

pub use codec::{CodecError, CredentialCodec};
pub use dispatcher::{authenticate, AuthError, AuthScheme, RequestIdentity};
