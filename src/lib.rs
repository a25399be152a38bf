//! ALTS-style transport credentials with handshake admission control.
//!
//! # Architecture Overview
//!
//! ```text
//!     RPC framework
//!         │ client_handshake(ctx, authority, raw) / server_handshake(raw)
//!         ▼
//!  ┌──────────────────┐     ┌──────────────┐     ┌───────────────┐
//!  │   credentials    │────▶│  Handshaker  │────▶│ AdmissionGate │  (process-wide)
//!  │ (AltsCredentials)│     │ (role-locked)│     └───────────────┘
//!  └──────────────────┘     └──────┬───────┘
//!                                  │ negotiate(role, raw, ctx)
//!                                  ▼
//!                           ┌──────────────┐
//!                           │  Negotiator  │  (external key exchange)
//!                           └──────────────┘
//! ```

pub mod config;
pub mod credentials;
pub mod handshake;
pub mod observability;

pub use config::HandshakeConfig;
pub use credentials::{AltsCredentials, ProtocolInfo, TransportCredentials};
pub use handshake::{AdmissionGate, HandshakeContext, HandshakeError, Handshaker, Negotiator, Side};
