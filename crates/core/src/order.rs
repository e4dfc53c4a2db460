//! Submitted orders: checkout validation, frozen line items and the total.
//!
//! An order's `total` is computed once from the cart at submission time,
//! rounded to 2 decimal places, and never recomputed afterwards - it is a
//! historical record even if the catalog's prices change later.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::{Cart, CartAddon, CartLineItem};
use crate::types::{OrderStatus, QueueNumber};

/// How long an unpaid (`New`) order stays alive before the expiry sweep
/// cancels it.
pub const PAYMENT_WINDOW: std::time::Duration = std::time::Duration::from_secs(10 * 60);

/// Checkout details the customer enters alongside the cart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutInfo {
    pub pickup_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub marketing_opt_in: bool,
}

/// A line item frozen at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub sku: String,
    pub name: String,
    pub unit_price: Decimal,
    pub qty: u32,
    #[serde(default)]
    pub addons: Vec<CartAddon>,
}

impl From<&CartLineItem> for OrderItem {
    fn from(line: &CartLineItem) -> Self {
        Self {
            sku: line.sku.as_str().to_string(),
            name: line.name.clone(),
            unit_price: line.unit_price,
            qty: line.qty,
            addons: line.addons.clone(),
        }
    }
}

/// Validation failures at submission. Both are rejected before any
/// persistence call; no partial order is ever created.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("cart is empty")]
    EmptyCart,
    #[error("pickup name is required")]
    BlankPickupName,
}

/// A validated order awaiting a queue number and a creation timestamp,
/// both assigned by the order store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDraft {
    pub items: Vec<OrderItem>,
    /// Cart subtotal rounded to 2 decimal places, the final total.
    pub total: Decimal,
    pub pickup_name: String,
    pub phone: Option<String>,
    pub note: Option<String>,
    pub marketing_opt_in: bool,
}

impl OrderDraft {
    /// Validate a cart + checkout info into a draft, freezing the line
    /// items and rounding the total once.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::EmptyCart` for an empty cart and
    /// `SubmitError::BlankPickupName` for a blank or whitespace-only
    /// pickup name.
    pub fn from_cart(cart: &Cart, info: CheckoutInfo) -> Result<Self, SubmitError> {
        if cart.is_empty() {
            return Err(SubmitError::EmptyCart);
        }
        let pickup_name = info.pickup_name.trim().to_string();
        if pickup_name.is_empty() {
            return Err(SubmitError::BlankPickupName);
        }
        Ok(Self {
            items: cart.items().iter().map(OrderItem::from).collect(),
            total: cart.subtotal().round_dp(2),
            pickup_name,
            phone: info.phone,
            note: info.note,
            marketing_opt_in: info.marketing_opt_in,
        })
    }
}

/// A submitted order as kept by the order store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Queue number, unique within the yearly reset period.
    pub id: QueueNumber,
    pub items: Vec<OrderItem>,
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    /// `created_at + payment window`; present while the order can still
    /// auto-cancel.
    pub expires_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
    pub pickup_name: String,
    pub phone: Option<String>,
    pub marketing_opt_in: bool,
}

impl Order {
    /// Materialize a draft into a stored order: status `New`, creation
    /// stamped at `now`, expiry at `now + payment_window`.
    #[must_use]
    pub fn create(
        draft: OrderDraft,
        id: QueueNumber,
        now: DateTime<Utc>,
        payment_window: std::time::Duration,
    ) -> Self {
        let window = chrono::Duration::from_std(payment_window)
            .unwrap_or_else(|_| chrono::Duration::minutes(10));
        Self {
            id,
            items: draft.items,
            total: draft.total,
            status: OrderStatus::New,
            created_at: now,
            expires_at: Some(now + window),
            note: draft.note,
            pickup_name: draft.pickup_name,
            phone: draft.phone,
            marketing_opt_in: draft.marketing_opt_in,
        }
    }

    /// Whether the payment window has lapsed while the order is still
    /// unpaid. Only `New` orders expire.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.status == OrderStatus::New && self.expires_at.is_some_and(|at| now > at)
    }
}
