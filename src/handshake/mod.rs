//! Handshake admission and lifecycle.
//!
//! # Data Flow
//! ```text
//! Raw connection
//!     → handshaker.rs (role-locked, single use)
//!     → context.rs (fail fast if already cancelled/expired)
//!     → admission.rs (take a slot or reject with ResourceExhausted)
//!     → negotiator.rs (external key exchange, bounded by the context)
//!     → slot released, (secure connection, peer info) or error
//! ```
//!
//! # Design Decisions
//! - Admission rejects rather than queues
//! - Slots are RAII permits so every exit path releases exactly once
//! - The raw connection is moved, never shared, so no two handshakes touch it

pub mod admission;
pub mod context;
pub mod error;
pub mod handshaker;
pub mod negotiator;
pub mod options;
pub mod side;

pub use admission::{AdmissionGate, AdmissionPermit, GateInitError, MAX_PENDING_HANDSHAKES};
pub use context::HandshakeContext;
pub use error::{BoxError, HandshakeError};
pub use handshaker::{HandshakeState, Handshaker};
pub use negotiator::Negotiator;
pub use options::{ClientHandshakerOptions, HandshakeRole, ServerHandshakerOptions, FRAME_LIMIT};
pub use side::Side;
