//! Unified error handling for the counter HTTP surface.
//!
//! Provides a unified `AppError` type mapping domain failures to status
//! codes. All route handlers return `Result<T, AppError>`. Nothing here is
//! fatal to the process; every failure path degrades to "no state change"
//! plus a client-visible message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use pandan_stand_core::{CartError, SubmitError};

use crate::lifecycle::LifecycleError;
use crate::store::StoreError;

/// Application-level error type for the counter service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Checkout validation failed (empty cart, blank pickup name).
    #[error("Validation error: {0}")]
    Submit(#[from] SubmitError),

    /// Cart referenced an unknown catalog entry.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Lifecycle transition failed.
    #[error("Lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),

    /// Persistence write failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Staff PIN missing or wrong.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

/// JSON error body returned to clients.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Store(_)) {
            tracing::error!(error = %self, "request error");
        }

        let status = match &self {
            Self::Submit(_) | Self::Cart(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Lifecycle(err) => match err {
                LifecycleError::NotFound(_) => StatusCode::NOT_FOUND,
                LifecycleError::TransitionRejected { .. } => StatusCode::CONFLICT,
                LifecycleError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        };

        // Don't expose backend details to clients
        let message = match &self {
            Self::Store(_) | Self::Lifecycle(LifecycleError::Store(_)) => {
                "could not save the order, please try again".to_string()
            }
            _ => self.to_string(),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
