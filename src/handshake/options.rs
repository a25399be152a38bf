//! Role-specific handshaker options.

use crate::handshake::Side;

/// Maximum byte size of receive frames.
pub const FRAME_LIMIT: usize = 64 * 1024;

/// Options for a client-side handshaker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientHandshakerOptions {
    /// Address or authority of the server being dialled, for the negotiator
    /// to log or verify.
    pub target_name: Option<String>,
    /// Largest frame the negotiator should accept from the peer.
    pub max_frame_size: usize,
}

impl Default for ClientHandshakerOptions {
    fn default() -> Self {
        Self {
            target_name: None,
            max_frame_size: FRAME_LIMIT,
        }
    }
}

/// Options for a server-side handshaker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerHandshakerOptions {
    /// Largest frame the negotiator should accept from the peer.
    pub max_frame_size: usize,
}

impl Default for ServerHandshakerOptions {
    fn default() -> Self {
        Self {
            max_frame_size: FRAME_LIMIT,
        }
    }
}

/// The side a handshaker was built for, together with that side's options.
///
/// Holding the side and its options in one value keeps them from disagreeing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeRole {
    Client(ClientHandshakerOptions),
    Server(ServerHandshakerOptions),
}

impl HandshakeRole {
    pub fn side(&self) -> Side {
        match self {
            HandshakeRole::Client(_) => Side::Client,
            HandshakeRole::Server(_) => Side::Server,
        }
    }

    pub fn max_frame_size(&self) -> usize {
        match self {
            HandshakeRole::Client(opts) => opts.max_frame_size,
            HandshakeRole::Server(opts) => opts.max_frame_size,
        }
    }

    /// Target name for client roles.
    pub fn target_name(&self) -> Option<&str> {
        match self {
            HandshakeRole::Client(opts) => opts.target_name.as_deref(),
            HandshakeRole::Server(_) => None,
        }
    }
}
