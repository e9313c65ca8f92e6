//! # API crate: the notebook's HTTP server
//!
//! An axum [`Router`] serving JSON under `/api`. Identity comes from a
//! `tower-sessions` session; persistence goes through the repository traits
//! so the same handlers run against PostgreSQL or process memory.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | Session identity extractor, session layer, Argon2id password hashing |
//! | [`db`] | PostgreSQL pool and embedded migrations |
//! | [`error`] | [`ApiError`] and its mapping to status codes |
//! | [`models`] | Database rows and their client-safe projections |
//! | [`repository`] | User and document persistence, PostgreSQL and in-memory |
//! | [`routes`] | Handlers for `/api/auth/*` and `/api/documents*` |
//! | [`settings`] | Layered server configuration |
//!
//! ## Routes
//!
//! - **Auth**: `POST register`, `POST login`, `POST logout`, `GET user`,
//!   `POST sync-user` under `/api/auth`
//! - **Documents**: `GET`/`POST /api/documents`,
//!   `GET`/`PATCH`/`DELETE /api/documents/{id}`

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod repository;
pub mod routes;
pub mod settings;

pub use error::{ApiError, ApiResult};
pub use repository::{DocumentRepository, UserRepository};
pub use settings::Settings;

use repository::{
    MemoryDocumentRepository, MemoryUserRepository, PgDocumentRepository, PgUserRepository,
};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub documents: Arc<dyn DocumentRepository>,
}

impl AppState {
    pub fn new(users: Arc<dyn UserRepository>, documents: Arc<dyn DocumentRepository>) -> Self {
        Self { users, documents }
    }

    pub fn postgres(pool: sqlx::PgPool) -> Self {
        Self::new(
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgDocumentRepository::new(pool)),
        )
    }

    pub fn memory() -> Self {
        Self::new(
            Arc::new(MemoryUserRepository::new()),
            Arc::new(MemoryDocumentRepository::new()),
        )
    }
}

/// All routes. The caller adds the session layer, see [`auth::session_layer`].
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/logout", post(routes::auth::logout))
        .route("/api/auth/user", get(routes::auth::current_user))
        .route("/api/auth/sync-user", post(routes::auth::sync_user))
        .route(
            "/api/documents",
            get(routes::documents::list).post(routes::documents::create),
        )
        .route(
            "/api/documents/{id}",
            get(routes::documents::get)
                .patch(routes::documents::update)
                .delete(routes::documents::delete),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
