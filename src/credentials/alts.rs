//! ALTS transport credentials.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::{HandshakeConfig, DEFAULT_SERVER_HANDSHAKE_TIMEOUT};
use crate::credentials::{ProtocolInfo, TransportCredentials};
use crate::handshake::{
    AdmissionGate, ClientHandshakerOptions, HandshakeContext, HandshakeError, Handshaker,
    Negotiator, ServerHandshakerOptions, Side, FRAME_LIMIT,
};

/// Client-side credential options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Largest frame accepted from the server during negotiation.
    pub max_frame_size: usize,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            max_frame_size: FRAME_LIMIT,
        }
    }
}

/// Server-side credential options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerOptions {
    /// Largest frame accepted from the client during negotiation.
    pub max_frame_size: usize,
    /// Deadline applied to every server handshake.
    pub handshake_timeout: Duration,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            max_frame_size: FRAME_LIMIT,
            handshake_timeout: DEFAULT_SERVER_HANDSHAKE_TIMEOUT,
        }
    }
}

/// Transport credentials authenticating connections through a [`Negotiator`].
pub struct AltsCredentials<N: Negotiator> {
    info: ProtocolInfo,
    side: Side,
    negotiator: Arc<N>,
    gate: Option<Arc<AdmissionGate>>,
    max_frame_size: usize,
    server_timeout: Duration,
}

impl<N: Negotiator> AltsCredentials<N> {
    /// Client-side credentials.
    pub fn client(negotiator: Arc<N>, opts: ClientOptions) -> Self {
        Self::new(
            Side::Client,
            negotiator,
            opts.max_frame_size,
            DEFAULT_SERVER_HANDSHAKE_TIMEOUT,
        )
    }

    /// Server-side credentials.
    pub fn server(negotiator: Arc<N>, opts: ServerOptions) -> Self {
        Self::new(
            Side::Server,
            negotiator,
            opts.max_frame_size,
            opts.handshake_timeout,
        )
    }

    /// Credentials for `side` using the timeout and frame size from `config`.
    ///
    /// The admission capacity in `config` is applied separately through
    /// [`AdmissionGate::init_global`].
    pub fn from_config(side: Side, negotiator: Arc<N>, config: &HandshakeConfig) -> Self {
        Self::new(
            side,
            negotiator,
            config.handshaker.max_frame_size,
            config.timeouts.server_handshake(),
        )
    }

    fn new(side: Side, negotiator: Arc<N>, max_frame_size: usize, server_timeout: Duration) -> Self {
        Self {
            info: ProtocolInfo::alts(),
            side,
            negotiator,
            gate: None,
            max_frame_size,
            server_timeout,
        }
    }

    /// Admit handshakes through `gate` instead of the global gate.
    pub fn with_gate(mut self, gate: Arc<AdmissionGate>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn server_timeout(&self) -> Duration {
        self.server_timeout
    }

    /// The gate handshakes are admitted through.
    pub fn gate(&self) -> Arc<AdmissionGate> {
        self.gate.clone().unwrap_or_else(AdmissionGate::global)
    }
}

impl<N: Negotiator> Clone for AltsCredentials<N> {
    fn clone(&self) -> Self {
        Self {
            info: self.info.clone(),
            side: self.side,
            negotiator: Arc::clone(&self.negotiator),
            gate: self.gate.clone(),
            max_frame_size: self.max_frame_size,
            server_timeout: self.server_timeout,
        }
    }
}

impl<N: Negotiator> fmt::Debug for AltsCredentials<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AltsCredentials")
            .field("info", &self.info)
            .field("side", &self.side)
            .field("max_frame_size", &self.max_frame_size)
            .field("server_timeout", &self.server_timeout)
            .finish()
    }
}

#[async_trait]
impl<N: Negotiator> TransportCredentials for AltsCredentials<N> {
    type RawConn = N::RawConn;
    type SecureConn = N::SecureConn;
    type AuthInfo = N::PeerInfo;

    async fn client_handshake(
        &self,
        ctx: &HandshakeContext,
        authority: &str,
        raw: N::RawConn,
    ) -> Result<(N::SecureConn, N::PeerInfo), HandshakeError> {
        let opts = ClientHandshakerOptions {
            target_name: Some(authority.to_string()),
            max_frame_size: self.max_frame_size,
        };
        let mut handshaker =
            Handshaker::client(Arc::clone(&self.negotiator), raw, opts).with_gate(self.gate());
        tracing::debug!(id = handshaker.id(), authority, "Starting client handshake");

        match handshaker.client_handshake(ctx).await {
            Ok(established) => Ok(established),
            Err(e) => {
                handshaker.close();
                Err(e)
            }
        }
    }

    async fn server_handshake(
        &self,
        raw: N::RawConn,
    ) -> Result<(N::SecureConn, N::PeerInfo), HandshakeError> {
        let ctx = HandshakeContext::with_timeout(self.server_timeout);
        let opts = ServerHandshakerOptions {
            max_frame_size: self.max_frame_size,
        };
        let mut handshaker =
            Handshaker::server(Arc::clone(&self.negotiator), raw, opts).with_gate(self.gate());
        tracing::debug!(
            id = handshaker.id(),
            timeout_ms = self.server_timeout.as_millis() as u64,
            "Starting server handshake"
        );

        match handshaker.server_handshake(&ctx).await {
            Ok(established) => Ok(established),
            Err(e) => {
                handshaker.close();
                Err(e)
            }
        }
    }

    fn info(&self) -> ProtocolInfo {
        self.info.clone()
    }

    fn override_server_name(&mut self, server_name: &str) -> Result<(), HandshakeError> {
        self.info.server_name = server_name.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{SECURITY_PROTOCOL, SECURITY_VERSION};
    use crate::handshake::{BoxError, HandshakeRole};

    struct Refuse;

    #[async_trait]
    impl Negotiator for Refuse {
        type RawConn = ();
        type SecureConn = ();
        type PeerInfo = ();

        async fn negotiate(
            &self,
            _role: &HandshakeRole,
            _conn: (),
            _ctx: &HandshakeContext,
        ) -> Result<((), ()), BoxError> {
            Err("refused".into())
        }
    }

    #[test]
    fn info_reports_protocol() {
        let creds = AltsCredentials::client(Arc::new(Refuse), ClientOptions::default());
        let info = creds.info();
        assert_eq!(info.security_protocol, SECURITY_PROTOCOL);
        assert_eq!(info.security_version, SECURITY_VERSION);
        assert!(info.server_name.is_empty());
    }

    #[test]
    fn info_is_a_snapshot() {
        let mut creds = AltsCredentials::client(Arc::new(Refuse), ClientOptions::default());
        let before = creds.info();
        creds.override_server_name("backend.example").unwrap();
        assert!(before.server_name.is_empty());
        assert_eq!(creds.info().server_name, "backend.example");
    }

    #[test]
    fn clone_has_independent_identity() {
        let original = AltsCredentials::server(Arc::new(Refuse), ServerOptions::default());
        let mut copy = original.clone();
        copy.override_server_name("other.example").unwrap();

        assert_eq!(original.info().server_name, "");
        assert_eq!(copy.info().server_name, "other.example");
        assert_eq!(copy.side(), Side::Server);
        assert!(Arc::ptr_eq(&original.gate(), &copy.gate()));
    }

    #[test]
    fn from_config_applies_timeout() {
        let mut config = HandshakeConfig::default();
        config.timeouts.server_handshake_secs = 3;
        let creds = AltsCredentials::from_config(Side::Server, Arc::new(Refuse), &config);
        assert_eq!(creds.server_timeout(), Duration::from_secs(3));
        assert_eq!(creds.side(), Side::Server);
    }

    #[tokio::test]
    async fn negotiation_error_is_surfaced() {
        let gate = Arc::new(AdmissionGate::new(1));
        let creds = AltsCredentials::client(Arc::new(Refuse), ClientOptions::default())
            .with_gate(gate.clone());

        let err = creds
            .client_handshake(&HandshakeContext::background(), "peer:443", ())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "negotiation failed: refused");
        assert_eq!(gate.in_flight(), 0);
    }
}
