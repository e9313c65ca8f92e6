//! HTTP handlers, one module per resource.

pub mod auth;
pub mod documents;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

/// Unwrap a JSON body, turning any rejection into a 400.
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    let Json(value) = body?;
    Ok(value)
}

/// Parse a path id before anything touches storage.
pub(crate) fn parse_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request("Invalid document id"))
}
