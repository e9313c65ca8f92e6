use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use store::wire::SyncUser;
use store::{Document, DocumentPatch, SidebarDocument};
use uuid::Uuid;

use super::{DocumentRepository, RepositoryError, RepositoryResult, UserRepository};
use crate::models::{DocumentRow, NewUser, SidebarRow, User};

#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: NewUser) -> RepositoryResult<User> {
        let result: Result<User, sqlx::Error> = sqlx::query_as(
            "INSERT INTO users (id, display_name, email, password_hash) VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&user.display_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(RepositoryError::Conflict(format!("user {}", user.email)))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        Ok(sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        Ok(sqlx::query_as("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn sync_profile(&self, id: Uuid, profile: &SyncUser) -> RepositoryResult<Option<User>> {
        Ok(sqlx::query_as(
            "UPDATE users SET
                display_name = COALESCE($2, display_name),
                image = COALESCE($3, image),
                email_confirmed = COALESCE($4, email_confirmed),
                updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(&profile.display_name)
        .bind(&profile.image)
        .bind(profile.email_confirmed)
        .fetch_optional(&self.pool)
        .await?)
    }
}

#[derive(Debug, Clone)]
pub struct PgDocumentRepository {
    pool: PgPool,
}

impl PgDocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentRepository for PgDocumentRepository {
    async fn list(&self, owner: Uuid) -> RepositoryResult<Vec<SidebarDocument>> {
        let rows: Vec<SidebarRow> = sqlx::query_as(
            "SELECT id, title, is_favorite, updated_at FROM documents
             WHERE user_id = $1
             ORDER BY updated_at DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(SidebarDocument::from).collect())
    }

    async fn create(&self, owner: Uuid, title: &str) -> RepositoryResult<Uuid> {
        let (id,): (Uuid,) =
            sqlx::query_as("INSERT INTO documents (id, user_id, title) VALUES ($1, $2, $3) RETURNING id")
                .bind(Uuid::new_v4())
                .bind(owner)
                .bind(title)
                .fetch_one(&self.pool)
                .await?;
        Ok(id)
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> RepositoryResult<Option<Document>> {
        let row: Option<DocumentRow> =
            sqlx::query_as("SELECT * FROM documents WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(owner)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Document::from))
    }

    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: &DocumentPatch,
    ) -> RepositoryResult<Option<DateTime<Utc>>> {
        let row: Option<(DateTime<Utc>,)> = sqlx::query_as(
            "UPDATE documents SET
                title = COALESCE($3, title),
                content = COALESCE($4, content),
                is_favorite = COALESCE($5, is_favorite),
                updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING updated_at",
        )
        .bind(id)
        .bind(owner)
        .bind(&patch.title)
        .bind(&patch.content)
        .bind(patch.is_favorite)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|(updated_at,)| updated_at))
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
