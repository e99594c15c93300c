//! # Tuning gate
//!
//! The gate decouples the asynchronous tuning channel from the control
//! computation. Tuning updates may arrive at any time on the tuning client's
//! background thread, the control law consumes them synchronously at the
//! start of a processing cycle. Only the most recent pending bundle is kept,
//! intermediate updates are coalesced (last-write-wins) and never applied
//! individually.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::sync::{Arc, Mutex};

// Internal
use comms_if::msg::TuningMsg;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Thread-safe holder for the latest pending tuning bundle.
///
/// Cloning the gate produces a handle onto the same pending slot, so one
/// clone can be handed to the tuning client while the control law keeps the
/// other.
#[derive(Clone, Default)]
pub struct TuningGate {
    pending: Arc<Mutex<Option<TuningMsg>>>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TuningGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a new desired bundle, replacing any pending one.
    ///
    /// Never blocks on the control computation and never triggers one.
    pub fn push(&self, bundle: TuningMsg) {
        let mut pending = self
            .pending
            .lock()
            .expect("TuningGate: pending mutex poisoned");

        *pending = Some(bundle);
    }

    /// Atomically read and clear the pending bundle.
    ///
    /// Returns `None` if no update has been pushed since the last take.
    pub fn take(&self) -> Option<TuningMsg> {
        self.pending
            .lock()
            .expect("TuningGate: pending mutex poisoned")
            .take()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn bundle(k_p: f64) -> TuningMsg {
        TuningMsg {
            target_speed_ms: 1.0,
            k_p,
            k_i: 0.0,
            k_d: 0.0,
            lookahead_m: 1.5,
        }
    }

    #[test]
    fn test_take_clears_pending() {
        let gate = TuningGate::new();

        gate.push(bundle(1.0));
        assert!(gate.take().is_some());
        assert!(gate.take().is_none());
    }

    #[test]
    fn test_updates_coalesce() {
        let gate = TuningGate::new();

        // Two pushes before a take, only the latest bundle survives
        gate.push(bundle(1.0));
        gate.push(bundle(2.0));

        let taken = gate.take().unwrap();
        assert_eq!(taken.k_p, 2.0);
        assert!(gate.take().is_none());
    }

    #[test]
    fn test_clones_share_the_slot() {
        let gate = TuningGate::new();
        let writer = gate.clone();

        writer.push(bundle(3.0));
        assert_eq!(gate.take().unwrap().k_p, 3.0);
    }
}
