//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use store::{ProcessorError, StoreError};
use thiserror::Error;

/// Failure of a read endpoint, rendered as `{"error": message}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The store could not be read.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        tracing::error!(error = %message, "request failed");

        let body = serde_json::json!({ "error": message });
        (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
    }
}

/// Failure of order creation, rendered as `{"success": false, "message": ...}`.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct OrderFailure(#[from] pub ProcessorError);

impl OrderFailure {
    /// Status code for the failure: 400 for bad payloads, 409 for orders
    /// that do not fit the catalog, 500 for storage faults.
    pub fn status(&self) -> StatusCode {
        match self.0 {
            ProcessorError::Rejected(_) => StatusCode::BAD_REQUEST,
            ProcessorError::Conflict(_) => StatusCode::CONFLICT,
            ProcessorError::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for OrderFailure {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({
            "success": false,
            "message": self.0.message(),
        });
        (status, axum::Json(body)).into_response()
    }
}
