//! Integration tests for Pandan Stand.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pandan-stand-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `order_flow` - Cart to order to lifecycle, against the store directly
//! - `http_api` - The counter's JSON surface via in-process `oneshot` calls
//!
//! The helpers below build a counter state with no artificial submit
//! latency and an in-memory store, so every test runs without a network or
//! a data file.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use pandan_stand_core::{Cart, Catalog, CheckoutInfo, OrderDraft};
use pandan_stand_counter::config::CounterConfig;
use pandan_stand_counter::state::AppState;
use pandan_stand_counter::store::OrderStore;

/// Counter state over a fresh in-memory store, zero submit latency.
#[must_use]
pub fn test_state(staff_pin: Option<&str>) -> AppState {
    let config = CounterConfig {
        submit_min_latency: Duration::ZERO,
        staff_pin: staff_pin.map(SecretString::from),
        ..CounterConfig::default()
    };
    let store = Arc::new(OrderStore::in_memory(config.payment_window));
    AppState::new(config, Catalog::stall_default(), store)
}

/// The full counter router over the given state.
#[must_use]
pub fn test_app(state: AppState) -> axum::Router {
    axum::Router::new()
        .merge(pandan_stand_counter::routes::routes())
        .with_state(state)
}

/// A small valid cart: two original waffles, one iced tea with the
/// coconut-cream add-on. Subtotal 29.00.
///
/// # Panics
///
/// Panics if the default catalog loses these entries.
#[must_use]
pub fn sample_cart() -> Cart {
    let catalog = Catalog::stall_default();
    let mut cart = Cart::new();
    cart.add_flavor(&catalog, "original").expect("known flavor");
    cart.add_flavor(&catalog, "original").expect("known flavor");
    cart.add_drink(&catalog, "iced-tea").expect("known drink");
    cart.add_addon(&catalog, &pandan_stand_core::Sku::for_drink("iced-tea"))
        .expect("addon configured");
    cart
}

/// Draft built from [`sample_cart`] for the given pickup name.
///
/// # Panics
///
/// Panics if validation fails (it cannot for a non-blank name).
#[must_use]
pub fn sample_draft(pickup_name: &str) -> OrderDraft {
    OrderDraft::from_cart(
        &sample_cart(),
        CheckoutInfo {
            pickup_name: pickup_name.to_string(),
            ..CheckoutInfo::default()
        },
    )
    .expect("sample cart is valid")
}
