//! Application-level error type returned by handlers.
//!
//! All variants serialise to the [`ErrorResponse`] JSON format and map to the
//! appropriate HTTP status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use socialgraph::ValidationError;
use socialgraph_api::{error::codes, ErrorResponse};

use crate::{engine::EngineError, storage::StorageError};

/// An error that a handler can return; converts directly to an HTTP response.
#[derive(Debug, PartialEq, Eq)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    /// The request contradicts the current subscription state.
    Conflict(String),
    /// A store call failed; the store's message is passed through.
    Store(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, codes::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, codes::INVALID_PARAMETER, msg),
            AppError::Conflict(msg) => (StatusCode::BAD_REQUEST, codes::CONFLICT, msg),
            AppError::Store(msg) => (StatusCode::BAD_REQUEST, codes::STORE_ERROR, msg),
            AppError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, codes::INTERNAL_ERROR, msg)
            }
        };
        let body = ErrorResponse::new(code, message);
        (status, Json(body)).into_response()
    }
}

/// Store failures surface as 400 with the store's message, so a `change` or
/// `delete` of an unknown id reads `"... not found"` with a 400 status.
impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        AppError::Store(e.to_string())
    }
}

impl From<EngineError> for AppError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::NotFound(msg) => AppError::NotFound(msg),
            EngineError::Conflict(msg) => AppError::Conflict(msg),
            EngineError::Store(msg) => AppError::Store(msg),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::BadRequest(e.to_string())
    }
}
