//! Deadline and cancellation scope for a handshake.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::handshake::HandshakeError;

/// Cancellation token plus optional deadline carried into a handshake.
///
/// Cloning shares the cancellation token; cancelling any clone cancels all.
#[derive(Debug, Clone, Default)]
pub struct HandshakeContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl HandshakeContext {
    /// A context with no deadline that is never cancelled unless asked to.
    pub fn background() -> Self {
        Self::default()
    }

    /// A fresh context expiring `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().child_with_timeout(timeout)
    }

    /// A context sharing the given cancellation token.
    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            cancel: token,
            deadline: None,
        }
    }

    /// Derive a child that is cancelled with this context and expires no
    /// later than `timeout` from now.
    ///
    /// A timeout too large to represent as an instant adds no deadline of its
    /// own; the child keeps whatever deadline this context has.
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        let deadline = match (self.deadline, Instant::now().checked_add(timeout)) {
            (Some(existing), Some(candidate)) => Some(existing.min(candidate)),
            (existing, None) => existing,
            (None, candidate) => candidate,
        };
        Self {
            cancel: self.cancel.child_token(),
            deadline,
        }
    }

    /// Cancel this context and every child derived from it.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// The cancellation token, for negotiators that select on it themselves.
    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline, if one is set.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Fail if the context is already cancelled or expired.
    pub fn check(&self) -> Result<(), HandshakeError> {
        if self.cancel.is_cancelled() {
            return Err(HandshakeError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if deadline <= Instant::now() => Err(HandshakeError::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Drive `fut` until it completes, the context is cancelled, or the
    /// deadline passes. The future is dropped on cancellation or expiry.
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, HandshakeError>
    where
        F: Future,
    {
        self.check()?;
        match self.deadline {
            Some(deadline) => tokio::select! {
                biased;
                _ = self.cancel.cancelled() => Err(HandshakeError::Cancelled),
                res = tokio::time::timeout_at(deadline, fut) => {
                    res.map_err(|_| HandshakeError::DeadlineExceeded)
                }
            },
            None => tokio::select! {
                biased;
                _ = self.cancel.cancelled() => Err(HandshakeError::Cancelled),
                out = fut => Ok(out),
            },
        }
    }
}
