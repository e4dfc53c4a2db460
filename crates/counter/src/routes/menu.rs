//! Menu route handler.

use axum::{Json, extract::State, response::IntoResponse};
use tracing::instrument;

use crate::state::AppState;

/// Serve the stall menu. Static data; the customer view builds its cart
/// from these ids and prices.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.catalog().clone())
}
