//! API error taxonomy
//!
//! Client-facing failures map to 400 with a `{"detail": ...}` body; internal
//! failures map to 500 and keep their cause out of the response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use render::RenderError;
use serde::Serialize;
use storage::StorageError;
use thiserror::Error;
use tracing::error;

/// Errors surfaced by the HTTP layer
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request parameters (bad timestamps, inverted range)
    #[error("{0}")]
    InvalidArgument(String),

    /// Unknown sensor or unit; the message names the requested id
    #[error("{0}")]
    NotFound(String),

    /// The converter produced no artifact for the requested format
    #[error("Failed to generate report.")]
    ConversionFailed,

    /// Invariant violation; never shown to the client in detail
    #[error("Internal server error")]
    Internal(String),
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::SensorNotFound(_) | StorageError::UnitNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            StorageError::StoreError(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// Error envelope, FastAPI-shaped
#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidArgument(_) | ApiError::NotFound(_) | ApiError::ConversionFailed => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Internal(cause) => {
                error!("Internal error: {}", cause);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorBody {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
