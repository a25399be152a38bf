//! Single-use, role-locked handshaker.
//!
//! # States
//! ```text
//! Created → InProgress → Completed
//!                      → Failed
//! Created/InProgress → Closed   (close)
//! ```
//!
//! A handshaker owns its raw connection until the connection is handed to the
//! negotiator or released by [`Handshaker::close`].

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tracing::Instrument;

use crate::handshake::{
    AdmissionGate, ClientHandshakerOptions, HandshakeContext, HandshakeError, HandshakeRole, Negotiator, ServerHandshakerOptions, Side,
};
use crate::observability::metrics;

static NEXT_HANDSHAKE_ID: AtomicU64 = AtomicU64::new(1);

/// Lifecycle state of a [`Handshaker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    /// Built, holding its connection, not yet run.
    Created,
    /// Admitted and negotiating.
    InProgress,
    /// Negotiation succeeded.
    Completed,
    /// Negotiation failed, was cancelled, or timed out.
    Failed,
    /// Closed before completing.
    Closed,
}

impl HandshakeState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            HandshakeState::Completed | HandshakeState::Failed | HandshakeState::Closed
        )
    }
}

/// Runs one handshake over one raw connection.
pub struct Handshaker<N: Negotiator> {
    id: u64,
    conn: Option<N::RawConn>,
    role: HandshakeRole,
    negotiator: Arc<N>,
    gate: Option<Arc<AdmissionGate>>,
    state: HandshakeState,
}

impl<N: Negotiator> Handshaker<N> {
    /// Create a client-side handshaker.
    ///
    /// Unless [`with_gate`](Handshaker::with_gate) is used, admission goes
    /// through [`AdmissionGate::global`], resolved when the handshake starts.
    pub fn client(negotiator: Arc<N>, conn: N::RawConn, opts: ClientHandshakerOptions) -> Self {
        Self::new(negotiator, conn, HandshakeRole::Client(opts))
    }

    /// Create a server-side handshaker.
    pub fn server(negotiator: Arc<N>, conn: N::RawConn, opts: ServerHandshakerOptions) -> Self {
        Self::new(negotiator, conn, HandshakeRole::Server(opts))
    }

    fn new(negotiator: Arc<N>, conn: N::RawConn, role: HandshakeRole) -> Self {
        Self {
            id: NEXT_HANDSHAKE_ID.fetch_add(1, Ordering::Relaxed),
            conn: Some(conn),
            role,
            negotiator,
            gate: None,
            state: HandshakeState::Created,
        }
    }

    /// Admit through `gate` instead of the global gate.
    pub fn with_gate(mut self, gate: Arc<AdmissionGate>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Process-unique id, recorded on the handshake span.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn side(&self) -> Side {
        self.role.side()
    }

    pub fn state(&self) -> HandshakeState {
        self.state
    }

    /// True while the raw connection has not been handed off or released.
    pub fn holds_connection(&self) -> bool {
        self.conn.is_some()
    }

    /// Run the client side of the handshake.
    ///
    /// On error the caller must [`close`](Handshaker::close) the handshaker.
    pub async fn client_handshake(
        &mut self,
        ctx: &HandshakeContext,
    ) -> Result<(N::SecureConn, N::PeerInfo), HandshakeError> {
        let span = tracing::info_span!("handshake", id = self.id, side = %Side::Client);
        self.handshake(Side::Client, ctx).instrument(span).await
    }

    /// Run the server side of the handshake.
    ///
    /// On error the caller must [`close`](Handshaker::close) the handshaker.
    pub async fn server_handshake(
        &mut self,
        ctx: &HandshakeContext,
    ) -> Result<(N::SecureConn, N::PeerInfo), HandshakeError> {
        let span = tracing::info_span!("handshake", id = self.id, side = %Side::Server);
        self.handshake(Side::Server, ctx).instrument(span).await
    }

    async fn handshake(
        &mut self,
        requested: Side,
        ctx: &HandshakeContext,
    ) -> Result<(N::SecureConn, N::PeerInfo), HandshakeError> {
        // An expired context must not take a slot.
        ctx.check()?;

        let gate = Arc::clone(self.gate.get_or_insert_with(AdmissionGate::global));
        let _permit = match gate.try_acquire() {
            Some(permit) => permit,
            None => {
                let limit = gate.capacity();
                tracing::warn!(limit, "Handshake rejected, admission gate full");
                metrics::record_rejected(requested);
                return Err(HandshakeError::ResourceExhausted { limit });
            }
        };

        let side = self.role.side();
        if side != requested {
            tracing::error!(handshaker = %side, requested = %requested, "Handshake role violation");
            return Err(HandshakeError::RoleViolation {
                handshaker: side,
                requested,
            });
        }

        let conn = match (self.state, self.conn.take()) {
            (HandshakeState::Created, Some(conn)) => conn,
            (state, conn) => {
                self.conn = conn;
                return Err(HandshakeError::InvalidState(state));
            }
        };

        self.state = HandshakeState::InProgress;
        tracing::debug!(in_flight = gate.in_flight(), "Handshake admitted");

        let started = Instant::now();
        let result = ctx
            .run(self.negotiator.negotiate(&self.role, conn, ctx))
            .await
            .and_then(|res| res.map_err(HandshakeError::Negotiation));
        let elapsed = started.elapsed();

        match &result {
            Ok(_) => {
                self.state = HandshakeState::Completed;
                tracing::debug!(elapsed_ms = elapsed.as_millis() as u64, "Handshake completed");
                metrics::record_handshake(side, "completed", elapsed);
            }
            Err(e) => {
                self.state = HandshakeState::Failed;
                tracing::warn!(error = %e, elapsed_ms = elapsed.as_millis() as u64, "Handshake failed");
                metrics::record_handshake(side, e.outcome_label(), elapsed);
            }
        }

        result
    }

    /// Release the raw connection if still held. Safe to call repeatedly.
    pub fn close(&mut self) {
        if self.conn.take().is_some() {
            tracing::trace!(id = self.id, "Handshaker closed, raw connection released");
        }
        if !self.state.is_terminal() {
            self.state = HandshakeState::Closed;
        }
    }
}

impl<N: Negotiator> fmt::Debug for Handshaker<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handshaker")
            .field("id", &self.id)
            .field("side", &self.role.side())
            .field("state", &self.state)
            .field("holds_connection", &self.conn.is_some())
            .finish()
    }
}
