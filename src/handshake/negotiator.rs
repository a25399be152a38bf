//! The external secure-channel negotiation this layer orchestrates.

use async_trait::async_trait;

use crate::handshake::{BoxError, HandshakeContext, HandshakeRole};

/// Performs the actual key exchange over a raw connection.
///
/// Implementations own the wire format and cryptography. They receive the raw
/// connection by value and either return the secure connection and peer
/// identity or an error; in both cases the raw connection is no longer held by
/// the handshaker. The handshaker enforces `ctx` around the call, but
/// long-running implementations should also watch [`HandshakeContext::token`]
/// to stop I/O early.
#[async_trait]
pub trait Negotiator: Send + Sync + 'static {
    /// Unauthenticated connection handed in by the transport.
    type RawConn: Send + 'static;
    /// Authenticated connection returned to the framework.
    type SecureConn: Send + 'static;
    /// Peer identity returned to the framework.
    type PeerInfo: Send + 'static;

    async fn negotiate(
        &self,
        role: &HandshakeRole,
        conn: Self::RawConn,
        ctx: &HandshakeContext,
    ) -> Result<(Self::SecureConn, Self::PeerInfo), BoxError>;
}
