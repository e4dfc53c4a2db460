//! The order store: persistence, queue numbering and change notification.
//!
//! An [`OrderStore`] is an injected instance with an explicit lifecycle -
//! constructed once at process start and handed to the lifecycle controller
//! and the HTTP state. There is no hidden singleton.
//!
//! Every mutation is a synchronous read-modify-write under one mutex: read
//! the full collection, transform it, write the full collection back through
//! the [`OrderBackend`]. That closes the in-process race window; two
//! *processes* sharing a file backend still race last-write-wins, which is
//! the accepted limitation of a single-counter deployment.
//!
//! Change notification is a snapshot observer: [`OrderStore::subscribe`]
//! hands out a `tokio::sync::watch` receiver whose value is the full current
//! collection. Every persisted change publishes a fresh snapshot; dropping
//! the receiver unregisters.

pub mod json;
pub mod memory;
pub mod wire;

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::watch;

use pandan_stand_core::{Order, OrderDraft, OrderStatus, QueueNumber, QueueSequence};

pub use json::JsonFileBackend;
pub use memory::MemoryBackend;
pub use wire::StoredState;

/// The stored collection is truncated to this many most-recent orders;
/// oldest are dropped first.
pub const MAX_STORED_ORDERS: usize = 300;

/// Errors from the persistence backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors from order store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Whole-collection read/write contract for the persisted order document.
///
/// Implementable as a local JSON file or a remote document collection; the
/// store only ever loads and saves the full [`StoredState`].
pub trait OrderBackend: Send + Sync {
    /// Load the persisted state.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` only for real I/O failures; a malformed
    /// document is an implementation's cue to degrade to the empty state.
    fn load(&self) -> Result<StoredState, BackendError>;

    /// Persist the full state.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the write fails.
    fn save(&self, state: &StoredState) -> Result<(), BackendError>;
}

/// Partial-field merge applied by [`OrderStore::update`]. Fields left
/// `None` are untouched; manual lifecycle transitions only ever carry
/// `status`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderPatch {
    pub status: Option<OrderStatus>,
    pub note: Option<String>,
}

impl OrderPatch {
    /// Patch that overwrites only the status.
    #[must_use]
    pub const fn status(status: OrderStatus) -> Self {
        Self {
            status: Some(status),
            note: None,
        }
    }

    fn apply(&self, order: &mut Order) {
        if let Some(status) = self.status {
            order.status = status;
        }
        if let Some(note) = &self.note {
            order.note = Some(note.clone());
        }
    }
}

/// Result of a checked status transition.
#[derive(Debug)]
pub enum TransitionOutcome {
    /// The transition was valid and has been persisted.
    Applied(Order),
    /// No order with that queue number.
    NotFound,
    /// The status machine rejected the move.
    Rejected { from: OrderStatus },
}

struct StoreInner {
    orders: Vec<Order>,
    seq: QueueSequence,
}

/// The persisted set of orders, sole writer of the backing document.
pub struct OrderStore {
    backend: Box<dyn OrderBackend>,
    payment_window: Duration,
    inner: Mutex<StoreInner>,
    snapshot_tx: watch::Sender<Vec<Order>>,
}

impl OrderStore {
    /// Open a store over the given backend.
    ///
    /// An unreadable or malformed persisted document degrades to the empty
    /// collection rather than failing startup - the board staying available
    /// wins over strict recovery.
    #[must_use]
    pub fn open(backend: Box<dyn OrderBackend>, payment_window: Duration) -> Self {
        let state = backend.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not read stored orders, starting empty");
            StoredState::default()
        });
        let (orders, seq) = state.into_parts(Utc::now());
        let (snapshot_tx, _) = watch::channel(orders.clone());
        Self {
            backend,
            payment_window,
            inner: Mutex::new(StoreInner { orders, seq }),
            snapshot_tx,
        }
    }

    /// In-memory store for tests and ephemeral deployments.
    #[must_use]
    pub fn in_memory(payment_window: Duration) -> Self {
        Self::open(Box::new(MemoryBackend::default()), payment_window)
    }

    /// The configured payment window.
    #[must_use]
    pub const fn payment_window(&self) -> Duration {
        self.payment_window
    }

    /// Submit a validated draft: assigns the next queue number, stamps the
    /// creation time, prepends the order and persists.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend write fails; the in-memory
    /// mutation is still visible (optimistic local update).
    pub fn create(&self, draft: OrderDraft) -> Result<Order, StoreError> {
        self.create_at(draft, Utc::now())
    }

    /// [`Self::create`] with an explicit submission time (tests drive the
    /// clock through this).
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend write fails.
    pub fn create_at(&self, draft: OrderDraft, now: DateTime<Utc>) -> Result<Order, StoreError> {
        let mut inner = self.lock();
        let id = inner.seq.next(now);
        let order = Order::create(draft, id, now, self.payment_window);
        inner.orders.insert(0, order.clone());
        inner.orders.truncate(MAX_STORED_ORDERS);
        self.persist_and_publish(&inner)?;
        tracing::info!(id = %order.id, total = %order.total, "order created");
        Ok(order)
    }

    /// Fetch one order by queue number.
    #[must_use]
    pub fn get(&self, id: &QueueNumber) -> Option<Order> {
        self.lock().orders.iter().find(|o| &o.id == id).cloned()
    }

    /// Merge a patch into the matching order. A missing id is a silent
    /// no-op (`Ok(None)`), not an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend write fails.
    pub fn update(&self, id: &QueueNumber, patch: &OrderPatch) -> Result<Option<Order>, StoreError> {
        let mut inner = self.lock();
        let Some(order) = inner.orders.iter_mut().find(|o| &o.id == id) else {
            return Ok(None);
        };
        patch.apply(order);
        let updated = order.clone();
        self.persist_and_publish(&inner)?;
        Ok(Some(updated))
    }

    /// Apply a status transition with the validity check and the write
    /// under the same lock, so two concurrent staff requests cannot race
    /// an order out of a terminal status between check and apply.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend write fails.
    pub fn transition_status(
        &self,
        id: &QueueNumber,
        target: OrderStatus,
    ) -> Result<TransitionOutcome, StoreError> {
        let mut inner = self.lock();
        let Some(order) = inner.orders.iter_mut().find(|o| &o.id == id) else {
            return Ok(TransitionOutcome::NotFound);
        };
        if !order.status.can_transition_to(target) {
            return Ok(TransitionOutcome::Rejected { from: order.status });
        }
        order.status = target;
        let updated = order.clone();
        self.persist_and_publish(&inner)?;
        Ok(TransitionOutcome::Applied(updated))
    }

    /// Remove the matching order. A missing id is a silent no-op
    /// (`Ok(false)`).
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend write fails.
    pub fn delete(&self, id: &QueueNumber) -> Result<bool, StoreError> {
        let mut inner = self.lock();
        let Some(pos) = inner.orders.iter().position(|o| &o.id == id) else {
            return Ok(false);
        };
        inner.orders.remove(pos);
        self.persist_and_publish(&inner)?;
        tracing::info!(%id, "order deleted");
        Ok(true)
    }

    /// Full read of the stored collection, prepend order (newest-first
    /// display sorting is the view layer's job).
    #[must_use]
    pub fn list_all(&self) -> Vec<Order> {
        self.lock().orders.clone()
    }

    /// Destructive clear; also resets the queue sequence.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend write fails.
    pub fn wipe_all(&self) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.orders.clear();
        inner.seq.reset(Utc::now());
        self.persist_and_publish(&inner)?;
        tracing::warn!("order store wiped");
        Ok(())
    }

    /// Flip every overdue `New` order to `Cancelled`, persisting once for
    /// the whole batch and only when something actually changed. Returns
    /// how many orders were cancelled; repeated sweeps are idempotent.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend write fails.
    pub fn sweep_expired(&self) -> Result<usize, StoreError> {
        self.sweep_expired_at(Utc::now())
    }

    /// [`Self::sweep_expired`] with an explicit current time.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend write fails.
    pub fn sweep_expired_at(&self, now: DateTime<Utc>) -> Result<usize, StoreError> {
        let mut inner = self.lock();
        let mut cancelled = 0;
        for order in &mut inner.orders {
            if order.is_expired(now) {
                order.status = OrderStatus::Cancelled;
                cancelled += 1;
            }
        }
        if cancelled > 0 {
            self.persist_and_publish(&inner)?;
        }
        Ok(cancelled)
    }

    /// Register a snapshot observer. The receiver's value is always the
    /// latest full collection; dropping it unregisters.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Order>> {
        self.snapshot_tx.subscribe()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist_and_publish(&self, inner: &StoreInner) -> Result<(), StoreError> {
        self.backend
            .save(&StoredState::from_parts(&inner.orders, inner.seq))?;
        self.snapshot_tx.send_replace(inner.orders.clone());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pandan_stand_core::{Cart, Catalog, CheckoutInfo};

    const WINDOW: Duration = Duration::from_secs(600);

    fn draft(name: &str) -> OrderDraft {
        let catalog = Catalog::stall_default();
        let mut cart = Cart::new();
        cart.add_flavor(&catalog, "original").unwrap();
        OrderDraft::from_cart(
            &cart,
            CheckoutInfo {
                pickup_name: name.to_string(),
                ..CheckoutInfo::default()
            },
        )
        .unwrap()
    }

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 2, h, m, 0).unwrap()
    }

    #[test]
    fn test_create_assigns_sequential_queue_numbers() {
        let store = OrderStore::in_memory(WINDOW);
        let first = store.create_at(draft("May"), at(9, 0)).unwrap();
        let second = store.create_at(draft("Linh"), at(9, 5)).unwrap();
        assert_eq!(first.id.as_str(), "Q-001");
        assert_eq!(second.id.as_str(), "Q-002");
        // Newest prepended
        assert_eq!(store.list_all()[0].id, second.id);
    }

    #[test]
    fn test_collection_truncated_to_cap() {
        let store = OrderStore::in_memory(WINDOW);
        for _ in 0..(MAX_STORED_ORDERS + 5) {
            store.create_at(draft("x"), at(9, 0)).unwrap();
        }
        let orders = store.list_all();
        assert_eq!(orders.len(), MAX_STORED_ORDERS);
        // Oldest (Q-001..Q-005) dropped first
        assert_eq!(orders.last().unwrap().id.as_str(), "Q-006");
    }

    #[test]
    fn test_update_missing_id_is_noop() {
        let store = OrderStore::in_memory(WINDOW);
        let result = store
            .update(&QueueNumber::from("Q-404"), &OrderPatch::status(OrderStatus::Paid))
            .unwrap();
        assert!(result.is_none());
        assert!(store.list_all().is_empty());
    }

    #[test]
    fn test_delete_missing_id_is_noop() {
        let store = OrderStore::in_memory(WINDOW);
        assert!(!store.delete(&QueueNumber::from("Q-404")).unwrap());
    }

    #[test]
    fn test_wipe_resets_queue_sequence() {
        let store = OrderStore::in_memory(WINDOW);
        store.create_at(draft("May"), at(9, 0)).unwrap();
        store.create_at(draft("Linh"), at(9, 1)).unwrap();
        store.wipe_all().unwrap();
        assert!(store.list_all().is_empty());
        let next = store.create_at(draft("Anh"), at(9, 2)).unwrap();
        assert_eq!(next.id.as_str(), "Q-001");
    }

    #[test]
    fn test_sweep_flips_overdue_new_orders_once() {
        let store = OrderStore::in_memory(WINDOW);
        let t = at(10, 0);
        let order = store.create_at(draft("May"), t).unwrap();

        // Inside the window: nothing happens
        let swept = store
            .sweep_expired_at(t + chrono::Duration::milliseconds(600_000))
            .unwrap();
        assert_eq!(swept, 0);

        // Just past the window: cancelled exactly once
        let past = t + chrono::Duration::milliseconds(601_000);
        assert_eq!(store.sweep_expired_at(past).unwrap(), 1);
        assert_eq!(store.get(&order.id).unwrap().status, OrderStatus::Cancelled);

        // Idempotent on repeat
        assert_eq!(store.sweep_expired_at(past).unwrap(), 0);
    }

    #[test]
    fn test_sweep_leaves_paid_orders_alone() {
        let store = OrderStore::in_memory(WINDOW);
        let t = at(10, 0);
        let order = store.create_at(draft("May"), t).unwrap();
        store
            .update(&order.id, &OrderPatch::status(OrderStatus::Paid))
            .unwrap();
        let swept = store.sweep_expired_at(t + chrono::Duration::hours(3)).unwrap();
        assert_eq!(swept, 0);
        assert_eq!(store.get(&order.id).unwrap().status, OrderStatus::Paid);
    }

    #[test]
    fn test_subscribers_see_every_persisted_change() {
        let store = OrderStore::in_memory(WINDOW);
        let rx = store.subscribe();
        assert!(rx.borrow().is_empty());

        let order = store.create_at(draft("May"), at(9, 0)).unwrap();
        assert_eq!(rx.borrow().len(), 1);

        store.delete(&order.id).unwrap();
        assert!(rx.borrow().is_empty());
    }

    #[test]
    fn test_transition_status_checks_and_applies_under_one_lock() {
        let store = OrderStore::in_memory(WINDOW);
        let order = store.create_at(draft("May"), at(9, 0)).unwrap();

        let outcome = store.transition_status(&order.id, OrderStatus::Done).unwrap();
        assert!(matches!(outcome, TransitionOutcome::Applied(_)));

        // Terminal now: a second transition attempt is rejected with the
        // status the order actually holds, and nothing is written
        let outcome = store.transition_status(&order.id, OrderStatus::Paid).unwrap();
        assert!(matches!(
            outcome,
            TransitionOutcome::Rejected {
                from: OrderStatus::Done
            }
        ));
        assert_eq!(store.get(&order.id).unwrap().status, OrderStatus::Done);

        let outcome = store
            .transition_status(&QueueNumber::from("Q-404"), OrderStatus::Paid)
            .unwrap();
        assert!(matches!(outcome, TransitionOutcome::NotFound));
    }

    #[test]
    fn test_update_merges_note_without_touching_status() {
        let store = OrderStore::in_memory(WINDOW);
        let order = store.create_at(draft("May"), at(9, 0)).unwrap();
        let patch = OrderPatch {
            status: None,
            note: Some("no peanuts".to_string()),
        };
        let updated = store.update(&order.id, &patch).unwrap().unwrap();
        assert_eq!(updated.status, OrderStatus::New);
        assert_eq!(updated.note.as_deref(), Some("no peanuts"));
    }
}
