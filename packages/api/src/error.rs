//! HTTP error type for every handler.
//!
//! Each variant maps to one status code and renders as `{ "message": ... }`.
//! Internal failures are logged where they are converted and reach the
//! client only as a generic message.

use std::fmt::Display;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use store::wire::Message;

/// Returned for missing and foreign documents alike.
pub const DOCUMENT_NOT_FOUND: &str =
    "Either the document is not found, or you are not allowed to access it.";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Internal server error while {0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized() -> Self {
        ApiError::Unauthorized("Unauthorized".to_string())
    }

    pub fn document_not_found() -> Self {
        ApiError::NotFound(DOCUMENT_NOT_FOUND.to_string())
    }

    /// Log `err` and hide it behind "Internal server error while {action}".
    pub fn internal(action: &str, err: impl Display) -> Self {
        tracing::error!(error = %err, "internal error while {action}");
        ApiError::Internal(action.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(Message::new(self.to_string()))).into_response()
    }
}
