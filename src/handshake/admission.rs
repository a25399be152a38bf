//! Admission control for concurrent handshakes.
//!
//! # Responsibilities
//! - Bound the number of handshakes in flight process-wide
//! - Reject, never queue, when the bound is reached
//! - Release slots exactly once via [`AdmissionPermit`]
//!
//! # Design Decisions
//! - The mutex guards only the counter and is never held across an await
//! - An unmatched release is a lifecycle bug and panics
//! - Only the process-wide gate reports the in-flight gauge

use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use thiserror::Error;

use crate::observability::metrics;

/// Default maximum number of concurrent handshakes.
pub const MAX_PENDING_HANDSHAKES: usize = 100;

static GLOBAL_GATE: OnceLock<Arc<AdmissionGate>> = OnceLock::new();

/// Returned when the process-wide gate is initialized twice.
#[derive(Debug, Error)]
#[error("global admission gate already initialized with capacity {existing}")]
pub struct GateInitError {
    pub existing: usize,
}

/// Counter bounding concurrent in-flight handshakes.
#[derive(Debug)]
pub struct AdmissionGate {
    capacity: usize,
    in_flight: Mutex<usize>,
    global: bool,
}

impl AdmissionGate {
    /// Create a gate admitting at most `capacity` handshakes at once.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            in_flight: Mutex::new(0),
            global: false,
        }
    }

    fn process_wide(capacity: usize) -> Self {
        Self {
            global: true,
            ..Self::new(capacity)
        }
    }

    /// The process-wide gate, created with [`MAX_PENDING_HANDSHAKES`] unless
    /// [`AdmissionGate::init_global`] ran first.
    pub fn global() -> Arc<AdmissionGate> {
        GLOBAL_GATE
            .get_or_init(|| Arc::new(AdmissionGate::process_wide(MAX_PENDING_HANDSHAKES)))
            .clone()
    }

    /// Initialize the process-wide gate with an explicit capacity.
    ///
    /// Must run before the first call to [`AdmissionGate::global`]. The gate
    /// lives for the rest of the process and is never reset.
    pub fn init_global(capacity: usize) -> Result<Arc<AdmissionGate>, GateInitError> {
        let gate = Arc::new(AdmissionGate::process_wide(capacity));
        match GLOBAL_GATE.set(gate.clone()) {
            Ok(()) => {
                tracing::info!(capacity, "Global admission gate initialized");
                Ok(gate)
            }
            Err(_) => Err(GateInitError {
                existing: Self::global().capacity(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, usize> {
        // The counter is only mutated after its invariant is checked, so a
        // poisoned lock still holds a consistent value.
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Take one slot if available. Never blocks.
    pub fn acquire(&self) -> bool {
        let mut in_flight = self.lock();
        let success = self.capacity - *in_flight >= 1;
        if success {
            *in_flight += 1;
            self.report(*in_flight);
        }
        success
    }

    /// Return one slot.
    ///
    /// # Panics
    /// If no slot is held. This indicates corrupted lifecycle state.
    pub fn release(&self) {
        let mut in_flight = self.lock();
        if *in_flight == 0 {
            drop(in_flight);
            panic!("bad release");
        }
        *in_flight -= 1;
        self.report(*in_flight);
    }

    fn report(&self, in_flight: usize) {
        if self.global {
            metrics::record_in_flight(in_flight);
        }
    }

    /// Take one slot, returning a permit that releases it on drop.
    pub fn try_acquire(self: &Arc<Self>) -> Option<AdmissionPermit> {
        if self.acquire() {
            Some(AdmissionPermit { gate: self.clone() })
        } else {
            None
        }
    }

    /// Number of handshakes currently admitted.
    pub fn in_flight(&self) -> usize {
        *self.lock()
    }

    /// Maximum number of concurrent handshakes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// True for the gate returned by [`AdmissionGate::global`].
    pub fn is_global(&self) -> bool {
        self.global
    }

    /// Slots still available.
    pub fn available(&self) -> usize {
        self.capacity - self.in_flight()
    }
}

/// A held admission slot. Released when dropped, including during unwinding.
#[derive(Debug)]
pub struct AdmissionPermit {
    gate: Arc<AdmissionGate>,
}

impl Drop for AdmissionPermit {
    fn drop(&mut self) {
        self.gate.release();
    }
}
