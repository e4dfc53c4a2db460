//! Staff board route handlers.
//!
//! When a PIN is configured the staff endpoints require it in the
//! `X-Staff-Pin` header. This gates the UI, nothing more: a single-stall
//! deployment treats it as a convenience, not a trust boundary.

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::instrument;

use pandan_stand_core::{Order, OrderStatus, QueueNumber};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Header carrying the shared staff PIN.
const PIN_HEADER: &str = "x-staff-pin";

fn require_pin(state: &AppState, headers: &HeaderMap) -> Result<()> {
    let Some(pin) = &state.config().staff_pin else {
        return Ok(());
    };
    let provided = headers
        .get(PIN_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if provided == pin.expose_secret() {
        Ok(())
    } else {
        Err(AppError::Unauthorized("staff pin required".to_string()))
    }
}

/// Full board snapshot, newest first (display ordering is this view
/// layer's job, not the store's).
#[instrument(skip(state, headers))]
pub async fn list(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<Vec<Order>>> {
    require_pin(&state, &headers)?;
    let mut orders = state.store().list_all();
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Json(orders))
}

/// Manual transition request body.
#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub status: OrderStatus,
}

/// Apply a manual status transition. Permissive by design: any non-terminal
/// order accepts any target status except `New`.
#[instrument(skip(state, headers))]
pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<TransitionRequest>,
) -> Result<Json<Order>> {
    require_pin(&state, &headers)?;
    let order = state
        .lifecycle()
        .transition(&QueueNumber::from(id), request.status)?;
    Ok(Json(order))
}

/// Delete an order regardless of status. A missing id is a silent no-op;
/// either way the caller gets 204.
#[instrument(skip(state, headers))]
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<impl IntoResponse> {
    require_pin(&state, &headers)?;
    state.lifecycle().delete(&QueueNumber::from(id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Wipe every order and reset the queue sequence.
#[instrument(skip(state, headers))]
pub async fn wipe(State(state): State<AppState>, headers: HeaderMap) -> Result<impl IntoResponse> {
    require_pin(&state, &headers)?;
    state.store().wipe_all()?;
    Ok(StatusCode::NO_CONTENT)
}
