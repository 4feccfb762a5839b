//! Error types for the gateway crate.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracker_core::CoreError;
use tracker_store::StoreError;

/// Body sent for every 5xx; the cause is only logged.
const INTERNAL_ERROR_BODY: &str = "Internal Server Error";

/// Errors that can occur during request handling.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GatewayError {
    /// A field failed validation. Displays the first failure only.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An error propagated from the store.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The request body or query string could not be decoded.
    #[error("{0}")]
    InvalidRequest(String),

    /// No route matched.
    #[error("not found")]
    NotFound,
}

impl GatewayError {
    /// HTTP status this error is reported with.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Core(CoreError::Validation(_)) | GatewayError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::Store(StoreError::DuplicateUsername(_)) => StatusCode::FORBIDDEN,
            GatewayError::Store(StoreError::UserNotFound(_)) | GatewayError::NotFound => {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            return (status, INTERNAL_ERROR_BODY).into_response();
        }
        tracing::debug!(%status, error = %self, "request rejected");
        (status, self.to_string()).into_response()
    }
}
