//! In-flight lock for a triggering control (a button, a key binding).
//!
//! A control is disabled for exactly as long as an [`InFlight`] guard is alive. The guard is
//! released on drop, so completion, failure and cancellation all re-enable the control.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct Control {
    name: &'static str,
    in_flight: Arc<AtomicBool>,
}

impl Control {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_enabled(&self) -> bool {
        !self.in_flight.load(Ordering::Acquire)
    }

    /// Disable the control, or return `None` if a request already holds it.
    pub fn try_acquire(&self) -> Option<InFlight> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight {
                in_flight: self.in_flight.clone(),
            })
    }
}

/// Proof that a request owns its control. Dropping it re-enables the control.
#[derive(Debug)]
pub struct InFlight {
    in_flight: Arc<AtomicBool>,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}
