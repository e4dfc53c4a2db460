//! HTTP route handlers for the counter service.
//!
//! The customer page and the staff board are a single page served by the
//! stall's QR code; a `mode=staff` query parameter selects the staff view
//! on the client. The JSON surface below is everything the two views
//! consume.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                        - Liveness check
//!
//! # Customer flow
//! GET  /api/menu                      - Catalog snapshot
//! POST /api/orders                    - Submit a cart (422 on validation failure)
//! GET  /api/orders/{id}               - Poll one order
//! GET  /api/orders/stream             - SSE stream of full snapshots
//!
//! # Staff flow (X-Staff-Pin header when a PIN is configured)
//! GET    /api/staff/orders            - Full board, newest first
//! POST   /api/staff/orders/{id}/status - Manual status transition
//! DELETE /api/staff/orders/{id}       - Delete an order
//! POST   /api/staff/wipe              - Wipe all orders, reset the queue
//! ```

pub mod menu;
pub mod orders;
pub mod staff;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Create the customer-facing routes router.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/api/menu", get(menu::show))
        .route("/api/orders", post(orders::submit))
        .route("/api/orders/stream", get(orders::stream))
        .route("/api/orders/{id}", get(orders::show))
}

/// Create the staff routes router.
pub fn staff_routes() -> Router<AppState> {
    Router::new()
        .route("/api/staff/orders", get(staff::list))
        .route("/api/staff/orders/{id}/status", post(staff::set_status))
        .route("/api/staff/orders/{id}", delete(staff::remove))
        .route("/api/staff/wipe", post(staff::wipe))
}

/// All routes combined.
pub fn routes() -> Router<AppState> {
    customer_routes().merge(staff_routes())
}
