use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::error::Error as _;
use thiserror::Error;

use super::protocol::ErrorResponse;
use super::validation::ValidationError;
use crate::storage::error::StoreError;

/// Everything a handler can fail with, mapped to one status code each.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    InvalidBody(#[from] JsonRejection),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidBody(rejection) => rejection.status(),
            ApiError::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::StorageUnavailable { .. }) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        }
    }

    fn status_text(&self) -> &'static str {
        match self {
            ApiError::Validation(_) | ApiError::InvalidBody(_) => "Invalid request.",
            ApiError::Store(StoreError::NotFound { .. }) => "User not found.",
            ApiError::Store(StoreError::StorageUnavailable { .. }) => "Storage unavailable.",
        }
    }

    /// The error message followed by every underlying cause, `: `-separated.
    pub fn error_chain(&self) -> String {
        let mut message = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = self.error_chain();

        if status.is_server_error() {
            tracing::error!("Request failed: {}", detail);
        } else {
            tracing::debug!("Request rejected ({}): {}", status, detail);
        }

        let body = ErrorResponse {
            status: self.status_text().to_string(),
            error: detail,
        };
        (status, Json(body)).into_response()
    }
}
