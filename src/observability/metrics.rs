//! Handshake metrics.
//!
//! # Metrics
//! - `alts_handshakes_in_flight` (gauge): admitted handshakes
//! - `alts_handshakes_rejected_total` (counter): admission rejections by side
//! - `alts_handshakes_total` (counter): finished handshakes by side, outcome
//! - `alts_handshake_duration_seconds` (histogram): negotiation latency
//!
//! Recorded through the `metrics` facade; without an installed recorder these
//! are no-ops.

use std::time::Duration;

use crate::handshake::Side;

pub const IN_FLIGHT: &str = "alts_handshakes_in_flight";
pub const REJECTED_TOTAL: &str = "alts_handshakes_rejected_total";
pub const HANDSHAKES_TOTAL: &str = "alts_handshakes_total";
pub const DURATION_SECONDS: &str = "alts_handshake_duration_seconds";

pub fn record_in_flight(in_flight: usize) {
    ::metrics::gauge!(IN_FLIGHT).set(in_flight as f64);
}

pub fn record_rejected(side: Side) {
    ::metrics::counter!(REJECTED_TOTAL, "side" => side.as_str()).increment(1);
}

pub fn record_handshake(side: Side, outcome: &'static str, elapsed: Duration) {
    ::metrics::counter!(HANDSHAKES_TOTAL, "side" => side.as_str(), "outcome" => outcome)
        .increment(1);
    ::metrics::histogram!(DURATION_SECONDS, "side" => side.as_str(), "outcome" => outcome)
        .record(elapsed.as_secs_f64());
}
