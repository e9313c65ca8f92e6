//! Session identity.
//!
//! The signed-in user's id is stored in the `tower-sessions` session under
//! [`SESSION_USER_ID_KEY`]. [`CurrentUser`] reads it back for handlers and
//! rejects the request with 401 when it is missing.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use time::Duration;
use tower_sessions::{Expiry, Session, SessionManagerLayer, SessionStore};
use uuid::Uuid;

use crate::error::ApiError;
use crate::settings;

/// Key for storing user ID in session.
pub const SESSION_USER_ID_KEY: &str = "user_id";

/// Session layer over `store` with the configured expiry.
pub fn session_layer<S: SessionStore + Clone>(
    store: S,
    settings: &settings::Session,
) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_secure(settings.secure)
        .with_expiry(Expiry::OnInactivity(Duration::days(settings.days)))
}

/// Id of the user that owns the request's session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub Uuid);

impl CurrentUser {
    /// Read the session's user id without rejecting the request.
    pub async fn from_session(session: &Session) -> Result<Option<Self>, ApiError> {
        let id: Option<String> = session
            .get(SESSION_USER_ID_KEY)
            .await
            .map_err(|e| ApiError::internal("reading the session", e))?;
        Ok(id
            .and_then(|id| Uuid::parse_str(&id).ok())
            .map(CurrentUser))
    }

    /// Remember `id` as the signed-in user, under a fresh session id.
    pub async fn sign_in(session: &Session, id: Uuid) -> Result<(), ApiError> {
        session
            .cycle_id()
            .await
            .map_err(|e| ApiError::internal("updating the session", e))?;
        session
            .insert(SESSION_USER_ID_KEY, id.to_string())
            .await
            .map_err(|e| ApiError::internal("updating the session", e))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, message)| ApiError::internal("loading the session", message))?;
        CurrentUser::from_session(&session)
            .await?
            .ok_or_else(ApiError::unauthorized)
    }
}
