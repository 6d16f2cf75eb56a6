//! Concurrency gate
//!
//! A counting admission primitive shared by every gated operation of one
//! synchronizer: bulk transfers and sub-directory listings draw from the
//! same pool of slots.
//!
//! ```text
//!   task ──acquire()──► [ slots: capacity ] ──► GatePermit ──drop──► slot freed
//!                          │ none free
//!                          ▼
//!                       FIFO wait queue
//! ```
//!
//! Waiters are admitted in arrival order (`tokio::sync::Semaphore` is fair).
//! A slot is returned when its [`GatePermit`] is dropped, so early returns
//! and `?` propagation can never leak one.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::SyncError;

/// Bounds the number of operations in flight at once.
#[derive(Debug)]
pub struct ConcurrencyGate {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

/// One occupied slot of a [`ConcurrencyGate`]; released on drop.
#[derive(Debug)]
#[must_use = "the slot is released as soon as the permit is dropped"]
pub struct GatePermit {
    _permit: OwnedSemaphorePermit,
}

impl GatePermit {
    /// Releases the slot now instead of at end of scope.
    pub fn release(self) {}
}

impl ConcurrencyGate {
    /// Creates a gate with `capacity` slots.
    ///
    /// A capacity of 0 is clamped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Waits for a free slot.
    ///
    /// # Errors
    /// Returns [`SyncError::GateClosed`] if the gate was closed while waiting.
    pub async fn acquire(&self) -> Result<GatePermit, SyncError> {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| SyncError::GateClosed)?;
        Ok(GatePermit { _permit: permit })
    }

    /// Number of free slots.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Total number of slots.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of slots currently held.
    pub fn in_use(&self) -> usize {
        self.capacity - self.available()
    }
}
