//! `/api/auth` handlers: local accounts on top of the session.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use store::wire::{Login, Message, Register, SyncUser, UserBody};
use tower_sessions::Session;

use super::json_body;
use crate::auth::{hash_password, verify_password, CurrentUser};
use crate::error::{ApiError, ApiResult};
use crate::models::{normalize_email, NewUser};
use crate::repository::RepositoryError;
use crate::AppState;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Register a new user with email and password, and sign them in.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    body: Result<Json<Register>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<UserBody>)> {
    let body = json_body(body)?;
    let email = normalize_email(&body.email);
    let name = body.name.trim().to_string();

    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::bad_request("Invalid email address"));
    }
    if body.password.chars().count() < 8 {
        return Err(ApiError::bad_request("Password must be at least 8 characters"));
    }
    if name.is_empty() {
        return Err(ApiError::bad_request("Name is required"));
    }

    let existing = state
        .users
        .find_by_email(&email)
        .await
        .map_err(|e| ApiError::internal("registering the user", e))?;
    if existing.is_some() {
        return Err(ApiError::Conflict(
            "An account with this email already exists".into(),
        ));
    }

    let password_hash =
        hash_password(&body.password).map_err(|e| ApiError::internal("registering the user", e))?;
    let user = state
        .users
        .create(NewUser {
            display_name: name,
            email,
            password_hash,
        })
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => {
                ApiError::Conflict("An account with this email already exists".into())
            }
            e => ApiError::internal("registering the user", e),
        })?;

    CurrentUser::sign_in(&session, user.id).await?;
    tracing::info!(user = %user.id, "user registered");
    Ok((StatusCode::CREATED, Json(UserBody { user: user.to_info() })))
}

/// Log in with email and password.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    body: Result<Json<Login>, JsonRejection>,
) -> ApiResult<Json<UserBody>> {
    let body = json_body(body)?;
    let email = normalize_email(&body.email);

    let user = state
        .users
        .find_by_email(&email)
        .await
        .map_err(|e| ApiError::internal("signing in", e))?;
    let Some(user) = user else {
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    let valid = verify_password(&body.password, &user.password_hash)
        .map_err(|e| ApiError::internal("signing in", e))?;
    if !valid {
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    CurrentUser::sign_in(&session, user.id).await?;
    Ok(Json(UserBody { user: user.to_info() }))
}

/// Log out the current user by clearing the session.
pub async fn logout(session: Session) -> ApiResult<StatusCode> {
    session
        .flush()
        .await
        .map_err(|e| ApiError::internal("signing out", e))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get the current authenticated user from the session.
pub async fn current_user(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<UserBody>> {
    let Some(CurrentUser(id)) = CurrentUser::from_session(&session).await? else {
        return Err(ApiError::unauthorized());
    };
    let user = state
        .users
        .find_by_id(id)
        .await
        .map_err(|e| ApiError::internal("fetching the user", e))?
        .ok_or_else(ApiError::unauthorized)?;
    Ok(Json(UserBody { user: user.to_info() }))
}

/// Re-sync the signed-in user's profile fields.
pub async fn sync_user(
    State(state): State<AppState>,
    CurrentUser(id): CurrentUser,
    body: Result<Json<SyncUser>, JsonRejection>,
) -> ApiResult<Json<Message>> {
    let profile = json_body(body)?;
    state
        .users
        .sync_profile(id, &profile)
        .await
        .map_err(|e| ApiError::internal("syncing the user", e))?
        .ok_or_else(ApiError::unauthorized)?;
    Ok(Json(Message::new("User synced successfully")))
}
