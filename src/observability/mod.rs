//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! handshake/ produces:
//!     → tracing spans and events (one span per handshake, keyed by handshake id)
//!     → metrics.rs (in-flight gauge, rejection and outcome counters, latency)
//!
//! logging.rs installs the subscriber for binaries and tests that want output.
//! ```
//!
//! # Design Decisions
//! - Library code only emits; installing subscribers/recorders is the host's call
//! - Rejections are warnings, role violations are errors

pub mod logging;
pub mod metrics;
