//! Wire format for the persisted order document.
//!
//! Timestamps cross the store boundary as plain epoch milliseconds; this
//! module is the single adapter between that representation and the
//! `chrono::DateTime<Utc>` values the core model uses.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pandan_stand_core::{Order, OrderItem, OrderStatus, QueueNumber, QueueSequence};

/// One order as persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredOrder {
    pub id: String,
    pub items: Vec<OrderItem>,
    pub total: Decimal,
    pub status: OrderStatus,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub note: Option<String>,
    pub pickup_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub marketing_opt_in: bool,
}

impl From<&Order> for StoredOrder {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.as_str().to_string(),
            items: order.items.clone(),
            total: order.total,
            status: order.status,
            created_at: order.created_at,
            expires_at: order.expires_at,
            note: order.note.clone(),
            pickup_name: order.pickup_name.clone(),
            phone: order.phone.clone(),
            marketing_opt_in: order.marketing_opt_in,
        }
    }
}

impl From<StoredOrder> for Order {
    fn from(stored: StoredOrder) -> Self {
        Self {
            id: QueueNumber::from(stored.id),
            items: stored.items,
            total: stored.total,
            status: stored.status,
            created_at: stored.created_at,
            expires_at: stored.expires_at,
            note: stored.note,
            pickup_name: stored.pickup_name,
            phone: stored.phone,
            marketing_opt_in: stored.marketing_opt_in,
        }
    }
}

/// The full persisted document: the order collection plus the queue
/// sequence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredState {
    #[serde(default)]
    pub orders: Vec<StoredOrder>,
    #[serde(default)]
    pub seq: Option<QueueSequence>,
}

impl StoredState {
    /// Build the wire document from live store state.
    #[must_use]
    pub fn from_parts(orders: &[Order], seq: QueueSequence) -> Self {
        Self {
            orders: orders.iter().map(StoredOrder::from).collect(),
            seq: Some(seq),
        }
    }

    /// Convert back into live store state. A document with no sequence
    /// (fresh or pre-sequence file) starts a new one at `now`.
    #[must_use]
    pub fn into_parts(self, now: DateTime<Utc>) -> (Vec<Order>, QueueSequence) {
        let seq = self.seq.unwrap_or_else(|| QueueSequence::starting_at(now));
        (self.orders.into_iter().map(Order::from).collect(), seq)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamps_serialize_as_epoch_millis() {
        let t = Utc.with_ymd_and_hms(2026, 3, 1, 11, 0, 0).unwrap();
        let stored = StoredOrder {
            id: "Q-001".to_string(),
            items: Vec::new(),
            total: Decimal::ZERO,
            status: OrderStatus::New,
            created_at: t,
            expires_at: Some(t + chrono::Duration::minutes(10)),
            note: None,
            pickup_name: "May".to_string(),
            phone: None,
            marketing_opt_in: false,
        };

        let value = serde_json::to_value(&stored).unwrap();
        assert_eq!(value["created_at"], t.timestamp_millis());
        assert_eq!(value["expires_at"], t.timestamp_millis() + 600_000);
    }

    #[test]
    fn test_document_without_sequence_starts_fresh() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 11, 0, 0).unwrap();
        let state: StoredState = serde_json::from_str("{}").unwrap();
        let (orders, seq) = state.into_parts(now);
        assert!(orders.is_empty());
        assert_eq!(seq.year, 2026);
        assert_eq!(seq.n, 0);
    }
}
