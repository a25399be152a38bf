//! The capability set an RPC framework expects from transport credentials.

use async_trait::async_trait;

use crate::credentials::ProtocolInfo;
use crate::handshake::{HandshakeContext, HandshakeError};

/// Upgrades raw connections into secure ones and reports protocol identity.
///
/// `Clone` must produce credentials whose protocol identity is independent of
/// the original.
#[async_trait]
pub trait TransportCredentials: Clone + Send + Sync {
    /// Unauthenticated connection handed in by the transport.
    type RawConn: Send + 'static;
    /// Authenticated connection handed back to the framework.
    type SecureConn;
    /// Peer identity handed back to the framework.
    type AuthInfo;

    /// Run the client handshake on `raw`, dialled to `authority`.
    ///
    /// On error no resources stay held.
    async fn client_handshake(
        &self,
        ctx: &HandshakeContext,
        authority: &str,
        raw: Self::RawConn,
    ) -> Result<(Self::SecureConn, Self::AuthInfo), HandshakeError>;

    /// Run the server handshake on `raw` under the credentials' own deadline.
    ///
    /// On error no resources stay held.
    async fn server_handshake(
        &self,
        raw: Self::RawConn,
    ) -> Result<(Self::SecureConn, Self::AuthInfo), HandshakeError>;

    /// Snapshot of the current protocol identity.
    fn info(&self) -> ProtocolInfo;

    /// Replace the server name reported in [`ProtocolInfo`].
    fn override_server_name(&mut self, server_name: &str) -> Result<(), HandshakeError>;
}
