//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges. Every violation is
//! reported, not just the first.

use thiserror::Error;

use crate::config::schema::HandshakeConfig;

/// Smallest frame a negotiator can be asked to work with.
pub const MIN_FRAME_SIZE: usize = 1024;
/// Largest frame a negotiator can be asked to buffer.
pub const MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;
/// Longest server handshake deadline accepted, one day.
pub const MAX_SERVER_HANDSHAKE_SECS: u64 = 24 * 60 * 60;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("admission.max_pending_handshakes must be greater than 0")]
    ZeroCapacity,

    #[error("timeouts.server_handshake_secs must be greater than 0")]
    ZeroServerTimeout,

    #[error(
        "timeouts.server_handshake_secs {0} exceeds {max}",
        max = MAX_SERVER_HANDSHAKE_SECS
    )]
    ServerTimeoutTooLong(u64),

    #[error(
        "handshaker.max_frame_size {0} is outside [{min}, {max}]",
        min = MIN_FRAME_SIZE,
        max = MAX_FRAME_SIZE
    )]
    FrameSizeOutOfRange(usize),

    #[error("observability.log_level {0:?} is not a known level")]
    UnknownLogLevel(String),
}

/// Check `config`, returning every violation found.
pub fn validate_config(config: &HandshakeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.admission.max_pending_handshakes == 0 {
        errors.push(ValidationError::ZeroCapacity);
    }
    let server_secs = config.timeouts.server_handshake_secs;
    if server_secs == 0 {
        errors.push(ValidationError::ZeroServerTimeout);
    } else if server_secs > MAX_SERVER_HANDSHAKE_SECS {
        errors.push(ValidationError::ServerTimeoutTooLong(server_secs));
    }
    let frame = config.handshaker.max_frame_size;
    if !(MIN_FRAME_SIZE..=MAX_FRAME_SIZE).contains(&frame) {
        errors.push(ValidationError::FrameSizeOutOfRange(frame));
    }
    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
