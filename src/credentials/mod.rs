//! Transport credentials subsystem.
//!
//! # Data Flow
//! ```text
//! RPC framework
//!     → transport.rs (TransportCredentials capability set)
//!     → alts.rs (builds one Handshaker per connection, closes it on error,
//!                applies the server-side deadline)
//!     → handshake/ (admission, negotiation)
//!     ← (secure connection, peer info) or HandshakeError
//! ```
//!
//! # Design Decisions
//! - Protocol identity is held by value so clones never alias
//! - Negotiator and admission gate are shared between clones

pub mod alts;
pub mod info;
pub mod transport;

pub use alts::{AltsCredentials, ClientOptions, ServerOptions};
pub use info::{ProtocolInfo, SECURITY_PROTOCOL, SECURITY_VERSION};
pub use transport::TransportCredentials;
