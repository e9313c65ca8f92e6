//! # Persistence seams
//!
//! Handlers reach storage only through [`UserRepository`] and
//! [`DocumentRepository`]. Every document operation takes the owner's id
//! and is scoped to it, so a foreign document looks exactly like a missing
//! one.
//!
//! | Implementation | Backing |
//! |----------------|---------|
//! | [`PgUserRepository`], [`PgDocumentRepository`] | PostgreSQL through `sqlx` |
//! | [`MemoryUserRepository`], [`MemoryDocumentRepository`] | process memory, for tests and the `memory` backend |

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use store::wire::SyncUser;
use store::{Document, DocumentPatch, SidebarDocument};
use uuid::Uuid;

use crate::models::{NewUser, User};

mod memory;
mod postgres;

pub use memory::{MemoryDocumentRepository, MemoryUserRepository};
pub use postgres::{PgDocumentRepository, PgUserRepository};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{0} already exists")]
    Conflict(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user. Fails with [`RepositoryError::Conflict`] when the email
    /// is taken.
    async fn create(&self, user: NewUser) -> RepositoryResult<User>;
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
    /// Overwrite the present profile fields and re-stamp `updated_at`.
    async fn sync_profile(&self, id: Uuid, profile: &SyncUser) -> RepositoryResult<Option<User>>;
}

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// The owner's documents, most recently updated first.
    async fn list(&self, owner: Uuid) -> RepositoryResult<Vec<SidebarDocument>>;
    async fn create(&self, owner: Uuid, title: &str) -> RepositoryResult<Uuid>;
    async fn get(&self, owner: Uuid, id: Uuid) -> RepositoryResult<Option<Document>>;
    /// Apply the present fields. Returns the new `updated_at`, or `None` when
    /// the owner has no such document.
    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: &DocumentPatch,
    ) -> RepositoryResult<Option<DateTime<Utc>>>;
    /// Returns whether a document was deleted.
    async fn delete(&self, owner: Uuid, id: Uuid) -> RepositoryResult<bool>;
}
