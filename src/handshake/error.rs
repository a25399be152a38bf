//! Handshake error taxonomy.

use thiserror::Error;

use crate::handshake::handshaker::HandshakeState;
use crate::handshake::Side;

/// Boxed error produced by a negotiator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by a handshake attempt.
#[derive(Debug, Error)]
pub enum HandshakeError {
    /// The admission gate is full. Callers may retry with backoff.
    #[error("maximum number of concurrent handshakes ({limit}) is reached")]
    ResourceExhausted { limit: usize },

    /// A handshake was requested for the side the handshaker was not built for.
    #[error("{requested} handshake requested on a {handshaker} handshaker")]
    RoleViolation { handshaker: Side, requested: Side },

    /// The negotiator failed. The channel must be treated as untrusted.
    #[error("negotiation failed: {0}")]
    Negotiation(#[source] BoxError),

    /// The handshake context was cancelled.
    #[error("handshake cancelled")]
    Cancelled,

    /// The handshake context deadline passed.
    #[error("handshake deadline exceeded")]
    DeadlineExceeded,

    /// The handshaker has already run or been closed.
    #[error("handshaker cannot start a handshake in state {0:?}")]
    InvalidState(HandshakeState),
}

impl HandshakeError {
    /// True for context cancellation or expiry.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, HandshakeError::Cancelled | HandshakeError::DeadlineExceeded)
    }

    /// True when the caller may retry later without changing anything.
    pub fn is_retryable(&self) -> bool {
        matches!(self, HandshakeError::ResourceExhausted { .. })
    }

    /// Consume the error, returning the negotiator's original error if any.
    pub fn into_negotiation_error(self) -> Option<BoxError> {
        match self {
            HandshakeError::Negotiation(e) => Some(e),
            _ => None,
        }
    }

    /// Short label used for metrics.
    pub(crate) fn outcome_label(&self) -> &'static str {
        match self {
            HandshakeError::ResourceExhausted { .. } => "rejected",
            HandshakeError::RoleViolation { .. } => "role_violation",
            HandshakeError::Negotiation(_) => "negotiation_failed",
            HandshakeError::Cancelled => "cancelled",
            HandshakeError::DeadlineExceeded => "deadline_exceeded",
            HandshakeError::InvalidState(_) => "invalid_state",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn negotiation_source_is_preserved() {
        let inner = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "peer hung up");
        let err = HandshakeError::Negotiation(Box::new(inner));

        let source = err.source().expect("source");
        assert_eq!(source.to_string(), "peer hung up");

        let original = err.into_negotiation_error().unwrap();
        let io = original.downcast_ref::<std::io::Error>().unwrap();
        assert_eq!(io.kind(), std::io::ErrorKind::ConnectionReset);
    }

    #[test]
    fn cancellation_is_not_negotiation_failure() {
        assert!(HandshakeError::Cancelled.is_cancellation());
        assert!(HandshakeError::DeadlineExceeded.is_cancellation());
        assert!(!HandshakeError::Negotiation("boom".into()).is_cancellation());
    }

    #[test]
    fn only_exhaustion_is_retryable() {
        assert!(HandshakeError::ResourceExhausted { limit: 1 }.is_retryable());
        let role = HandshakeError::RoleViolation {
            handshaker: Side::Client,
            requested: Side::Server,
        };
        assert!(!role.is_retryable());
        assert_eq!(role.to_string(), "server handshake requested on a client handshaker");
    }
}
