//! Shared negotiators for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use alts_credentials::handshake::{BoxError, HandshakeContext, HandshakeRole, Negotiator, Side};
use async_trait::async_trait;
use tokio::io::{duplex, AsyncReadExt, DuplexStream};
use tokio::sync::{mpsc, Semaphore};

/// Identity reported by the test negotiators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerIdentity {
    pub side: Side,
    pub target: Option<String>,
    pub max_frame_size: usize,
}

impl PeerIdentity {
    fn from_role(role: &HandshakeRole) -> Self {
        Self {
            side: role.side(),
            target: role.target_name().map(str::to_string),
            max_frame_size: role.max_frame_size(),
        }
    }
}

/// A raw connection and the peer end used to observe it.
pub fn raw_pair() -> (DuplexStream, DuplexStream) {
    duplex(1024)
}

/// True once the other end of `peer` has been dropped.
pub async fn is_closed(peer: &mut DuplexStream) -> bool {
    let mut buf = [0u8; 1];
    matches!(
        tokio::time::timeout(Duration::from_secs(1), peer.read(&mut buf)).await,
        Ok(Ok(0))
    )
}

/// Completes immediately, handing the raw stream back as the secure one.
pub struct Immediate;

#[async_trait]
impl Negotiator for Immediate {
    type RawConn = DuplexStream;
    type SecureConn = DuplexStream;
    type PeerInfo = PeerIdentity;

    async fn negotiate(
        &self,
        role: &HandshakeRole,
        conn: DuplexStream,
        _ctx: &HandshakeContext,
    ) -> Result<(DuplexStream, PeerIdentity), BoxError> {
        Ok((conn, PeerIdentity::from_role(role)))
    }
}

/// Signals on entry, then waits for a permit before finishing.
pub struct Gated {
    entered: mpsc::UnboundedSender<()>,
    proceed: Arc<Semaphore>,
    fail: bool,
}

impl Gated {
    /// Returns the negotiator, the entry signal and the release valve.
    pub fn new(fail: bool) -> (Self, mpsc::UnboundedReceiver<()>, Arc<Semaphore>) {
        let (entered, rx) = mpsc::unbounded_channel();
        let proceed = Arc::new(Semaphore::new(0));
        (
            Self {
                entered,
                proceed: proceed.clone(),
                fail,
            },
            rx,
            proceed,
        )
    }
}

#[async_trait]
impl Negotiator for Gated {
    type RawConn = DuplexStream;
    type SecureConn = DuplexStream;
    type PeerInfo = PeerIdentity;

    async fn negotiate(
        &self,
        role: &HandshakeRole,
        conn: DuplexStream,
        _ctx: &HandshakeContext,
    ) -> Result<(DuplexStream, PeerIdentity), BoxError> {
        let _ = self.entered.send(());
        self.proceed.acquire().await?.forget();
        if self.fail {
            return Err("peer rejected handshake".into());
        }
        Ok((conn, PeerIdentity::from_role(role)))
    }
}

/// Signals on entry and never finishes on its own.
pub struct Stalling {
    entered: mpsc::UnboundedSender<()>,
}

impl Stalling {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<()>) {
        let (entered, rx) = mpsc::unbounded_channel();
        (Self { entered }, rx)
    }
}

#[async_trait]
impl Negotiator for Stalling {
    type RawConn = DuplexStream;
    type SecureConn = DuplexStream;
    type PeerInfo = PeerIdentity;

    async fn negotiate(
        &self,
        _role: &HandshakeRole,
        _conn: DuplexStream,
        _ctx: &HandshakeContext,
    ) -> Result<(DuplexStream, PeerIdentity), BoxError> {
        let _ = self.entered.send(());
        std::future::pending().await
    }
}

/// Panics mid-negotiation.
pub struct Panicking;

#[async_trait]
impl Negotiator for Panicking {
    type RawConn = DuplexStream;
    type SecureConn = DuplexStream;
    type PeerInfo = PeerIdentity;

    async fn negotiate(
        &self,
        _role: &HandshakeRole,
        _conn: DuplexStream,
        _ctx: &HandshakeContext,
    ) -> Result<(DuplexStream, PeerIdentity), BoxError> {
        panic!("negotiator bug");
    }
}

/// Tracks how many negotiations overlap.
#[derive(Default)]
pub struct Counting {
    active: AtomicUsize,
    pub max_active: AtomicUsize,
}

#[async_trait]
impl Negotiator for Counting {
    type RawConn = DuplexStream;
    type SecureConn = DuplexStream;
    type PeerInfo = PeerIdentity;

    async fn negotiate(
        &self,
        role: &HandshakeRole,
        conn: DuplexStream,
        _ctx: &HandshakeContext,
    ) -> Result<(DuplexStream, PeerIdentity), BoxError> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.active.fetch_sub(1, Ordering::SeqCst);
        Ok((conn, PeerIdentity::from_role(role)))
    }
}
