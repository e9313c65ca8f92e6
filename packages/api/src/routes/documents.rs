//! `/api/documents` handlers.
//!
//! Every handler checks, in order: the session identity (401), the path id
//! (400), the body (400), and only then asks the repository, whose
//! owner-scoped queries turn foreign documents into 404s.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use store::wire::{CreateDocument, CreatedDocument, DocumentBody, DocumentList, DocumentUpdated};
use store::DocumentPatch;

use super::{json_body, parse_id};
use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<DocumentList>> {
    let documents = state
        .documents
        .list(user)
        .await
        .map_err(|e| ApiError::internal("fetching the documents", e))?;
    Ok(Json(DocumentList { documents }))
}

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    body: Result<Json<CreateDocument>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreatedDocument>)> {
    let body = json_body(body)?;
    let title = body.title.trim();
    if title.is_empty() {
        return Err(ApiError::bad_request("Title is required"));
    }

    let id = state
        .documents
        .create(user, title)
        .await
        .map_err(|e| ApiError::internal("creating the document", e))?;
    tracing::info!(document = %id, "document created");
    Ok((StatusCode::CREATED, Json(CreatedDocument { id })))
}

pub async fn get(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<DocumentBody>> {
    let id = parse_id(&id)?;
    let document = state
        .documents
        .get(user, id)
        .await
        .map_err(|e| ApiError::internal("fetching the document", e))?
        .ok_or_else(ApiError::document_not_found)?;
    Ok(Json(DocumentBody { document }))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    body: Result<Json<DocumentPatch>, JsonRejection>,
) -> ApiResult<Json<DocumentUpdated>> {
    let id = parse_id(&id)?;
    let mut patch = json_body(body)?;
    if patch.is_empty() {
        return Err(ApiError::bad_request("No content to update."));
    }
    if let Some(title) = patch.title.as_mut() {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(ApiError::bad_request("Title can not be empty"));
        }
        *title = trimmed.to_string();
    }

    let updated_at = state
        .documents
        .update(user, id, &patch)
        .await
        .map_err(|e| ApiError::internal("updating the document", e))?
        .ok_or_else(ApiError::document_not_found)?;
    Ok(Json(DocumentUpdated {
        message: "Document updated successfully!".to_string(),
        updated_at,
    }))
}

pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;
    let deleted = state
        .documents
        .delete(user, id)
        .await
        .map_err(|e| ApiError::internal("deleting the document", e))?;
    if !deleted {
        return Err(ApiError::document_not_found());
    }
    tracing::info!(document = %id, "document deleted");
    Ok(StatusCode::NO_CONTENT)
}
