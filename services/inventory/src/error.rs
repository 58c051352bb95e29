//! Custom error types for the inventory service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::{store::StoreError, validation::ValidationErrors};

/// Custom error type for the inventory service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Product missing or soft-deleted
    #[error("Not found")]
    NotFound,

    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request body failed validation
    #[error("Validation failed")]
    Validation(ValidationErrors),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,

    /// Store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::NotFound => return StatusCode::NOT_FOUND.into_response(),
            ApiError::Validation(errors) => {
                let body = Json(json!({
                    "title": "One or more validation errors occurred.",
                    "status": StatusCode::BAD_REQUEST.as_u16(),
                    "errors": errors,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
            ApiError::Store(e) => {
                error!("Store failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
