//! Lifecycle controller: operator transitions and the expiry sweep.
//!
//! The status machine is deliberately permissive for operators - any
//! non-terminal order may jump to any of `Paid`/`Preparing`/`Ready`/`Done`/
//! `Cancelled`, forward or backward, reflecting real-world corrections at
//! the counter (marking `Ready` straight from `New` when payment happened
//! off-screen). Strict sequential advancement is intentionally NOT
//! enforced. The only automatic transition is the sweep's
//! `New -> Cancelled` on payment-window expiry.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::instrument;

use pandan_stand_core::{Order, OrderStatus, QueueNumber};

use crate::store::{OrderStore, StoreError, TransitionOutcome};

/// Errors from operator-issued lifecycle operations.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("order {0} not found")]
    NotFound(QueueNumber),
    #[error("order {id} cannot move from {from} to {to}")]
    TransitionRejected {
        id: QueueNumber,
        from: OrderStatus,
        to: OrderStatus,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Advances orders through the status machine on behalf of staff and the
/// expiry sweep. Mutates only the `status` field; persistence goes through
/// the injected store.
#[derive(Clone)]
pub struct LifecycleController {
    store: Arc<OrderStore>,
}

impl LifecycleController {
    #[must_use]
    pub const fn new(store: Arc<OrderStore>) -> Self {
        Self { store }
    }

    /// Apply an operator transition and persist it. The validity check
    /// and the write happen atomically inside the store, so concurrent
    /// requests cannot move an order out of a terminal status.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown queue number; `TransitionRejected` when
    /// the order is in a terminal status (or the target is `New`);
    /// `Store` when the persistence write fails.
    #[instrument(skip(self), fields(id = %id, to = %target))]
    pub fn transition(
        &self,
        id: &QueueNumber,
        target: OrderStatus,
    ) -> Result<Order, LifecycleError> {
        match self.store.transition_status(id, target)? {
            TransitionOutcome::Applied(updated) => {
                tracing::info!("status changed");
                Ok(updated)
            }
            TransitionOutcome::NotFound => Err(LifecycleError::NotFound(id.clone())),
            TransitionOutcome::Rejected { from } => Err(LifecycleError::TransitionRejected {
                id: id.clone(),
                from,
                to: target,
            }),
        }
    }

    /// Remove an order entirely. Distinct from a status and available
    /// regardless of status; deleting an unknown id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `Store` when the persistence write fails.
    pub fn delete(&self, id: &QueueNumber) -> Result<bool, LifecycleError> {
        Ok(self.store.delete(id)?)
    }
}

/// Background task running the periodic expiry sweep.
///
/// Holds the task's join handle and aborts it on [`Sweeper::stop`] or drop,
/// so an unmounting service never leaks the timer.
pub struct Sweeper {
    handle: JoinHandle<()>,
}

impl Sweeper {
    /// Spawn the sweep loop on the current tokio runtime.
    #[must_use]
    pub fn spawn(store: Arc<OrderStore>, every: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut tick = tokio::time::interval(every);
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tick.tick().await;
                match store.sweep_expired() {
                    Ok(0) => {}
                    Ok(cancelled) => {
                        tracing::info!(cancelled, "expired unpaid orders cancelled");
                    }
                    Err(e) => tracing::error!(error = %e, "expiry sweep failed to persist"),
                }
            }
        });
        Self { handle }
    }

    /// Stop the sweep loop.
    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
