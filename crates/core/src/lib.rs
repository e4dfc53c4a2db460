//! Pandan Stand Core - Catalog, cart engine and order model.
//!
//! This crate provides the domain logic shared across all Pandan Stand
//! components:
//! - `counter` - The single-counter service (order store, lifecycle, HTTP)
//! - `cli` - Command-line tools for operators
//!
//! # Architecture
//!
//! The core crate contains only types and pure transformations - no I/O, no
//! timers, no HTTP. Persistence and change notification live in the
//! `counter` crate behind an explicit store boundary; this keeps the cart
//! arithmetic and the order model testable in isolation.
//!
//! # Modules
//!
//! - [`types`] - Order status, queue numbers and the queue sequence
//! - [`catalog`] - The fixed product/flavor/drink menu
//! - [`cart`] - Cart line items and subtotal arithmetic
//! - [`order`] - Submitted orders, frozen totals and checkout validation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod order;
pub mod types;

pub use cart::{Cart, CartAddon, CartError, CartLineItem, LineKind, Sku};
pub use catalog::{AddonDef, Catalog, Drink, Flavor};
pub use order::{CheckoutInfo, Order, OrderDraft, OrderItem, SubmitError, PAYMENT_WINDOW};
pub use types::{OrderStatus, QueueNumber, QueueSequence};
