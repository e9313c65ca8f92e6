use chrono::{DateTime, Utc};
use sqlx::FromRow;
use store::{Document, SidebarDocument};
use uuid::Uuid;

/// A row of the `documents` table.
#[derive(Debug, Clone, FromRow)]
pub struct DocumentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub is_archived: bool,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Document {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            content: row.content,
            is_archived: row.is_archived,
            is_favorite: row.is_favorite,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// The columns the sidebar needs.
#[derive(Debug, Clone, FromRow)]
pub struct SidebarRow {
    pub id: Uuid,
    pub title: String,
    pub is_favorite: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<SidebarRow> for SidebarDocument {
    fn from(row: SidebarRow) -> Self {
        SidebarDocument {
            id: row.id,
            title: row.title,
            is_favorite: row.is_favorite,
            updated_at: row.updated_at,
        }
    }
}
