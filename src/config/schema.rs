//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::handshake::{FRAME_LIMIT, MAX_PENDING_HANDSHAKES};

/// Default bound on the server-side handshake.
pub const DEFAULT_SERVER_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(30);

/// Root configuration for the handshake layer.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HandshakeConfig {
    /// Admission control.
    pub admission: AdmissionConfig,

    /// Handshake timeouts.
    pub timeouts: TimeoutConfig,

    /// Options passed through to handshakers.
    pub handshaker: HandshakerConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Admission control configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AdmissionConfig {
    /// Maximum concurrent handshakes, process-wide.
    pub max_pending_handshakes: usize,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            max_pending_handshakes: MAX_PENDING_HANDSHAKES,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Server handshake timeout in seconds. The framework supplies no deadline
    /// on the server path, so this one is always applied.
    pub server_handshake_secs: u64,
}

impl TimeoutConfig {
    pub fn server_handshake(&self) -> Duration {
        Duration::from_secs(self.server_handshake_secs)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            server_handshake_secs: DEFAULT_SERVER_HANDSHAKE_TIMEOUT.as_secs(),
        }
    }
}

/// Handshaker configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HandshakerConfig {
    /// Maximum byte size of receive frames.
    pub max_frame_size: usize,
}

impl Default for HandshakerConfig {
    fn default() -> Self {
        Self {
            max_frame_size: FRAME_LIMIT,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
