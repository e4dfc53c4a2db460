//! Customer order route handlers: submit, poll, snapshot stream.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{
        IntoResponse, Sse,
        sse::{Event, KeepAlive},
    },
};
use serde::Deserialize;
use tokio_stream::{Stream, StreamExt, wrappers::WatchStream};
use tracing::instrument;

use pandan_stand_core::{Cart, CartLineItem, CheckoutInfo, Order, OrderDraft, QueueNumber};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Submit request: the client-built cart plus checkout details. The cart
/// is replayed server-side against the catalog, so forged prices, skus
/// and add-on quantities never reach the store; a client-supplied total
/// is never accepted.
#[derive(Debug, Deserialize)]
pub struct SubmitOrderRequest {
    pub items: Vec<CartLineItem>,
    pub pickup_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub marketing_opt_in: bool,
}

/// Submit an order.
///
/// Validation (empty cart, blank pickup name) happens before any
/// persistence call; a rejected submission creates nothing. The configured
/// minimum latency is a UX affordance so the customer view can show its
/// busy state.
#[instrument(skip(state, request), fields(lines = request.items.len()))]
pub async fn submit(
    State(state): State<AppState>,
    Json(request): Json<SubmitOrderRequest>,
) -> Result<impl IntoResponse> {
    let min_latency = state.config().submit_min_latency;
    if !min_latency.is_zero() {
        tokio::time::sleep(min_latency).await;
    }

    let cart = Cart::rebuild(state.catalog(), &request.items)?;
    let draft = OrderDraft::from_cart(
        &cart,
        CheckoutInfo {
            pickup_name: request.pickup_name,
            phone: request.phone,
            note: request.note,
            marketing_opt_in: request.marketing_opt_in,
        },
    )?;
    let order = state.store().create(draft)?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Poll one order by queue number (the customer's "where is my order"
/// view).
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>> {
    let id = QueueNumber::from(id);
    state
        .store()
        .get(&id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))
}

/// SSE stream of full order snapshots, newest-first, one event per
/// persisted change. Closing the connection drops the subscription.
#[instrument(skip(state))]
pub async fn stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = std::result::Result<Event, axum::Error>>> {
    let rx = state.store().subscribe();
    let stream = WatchStream::new(rx).map(|mut orders| {
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Event::default().event("snapshot").json_data(&orders)
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}
