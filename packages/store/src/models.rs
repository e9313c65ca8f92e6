//! # Domain models shared by the server and the client engine
//!
//! These types cross the HTTP boundary as JSON, so they are all
//! `Serialize + Deserialize` with camelCase field names. The `api` crate
//! builds them from database rows; the client engine receives them from
//! [`crate::client::HttpClient`] and keeps them in observable state.
//!
//! ## Types
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`Document`] | A full document row: owner, title, optional markdown body, archive/favorite flags and audit timestamps. |
//! | [`SidebarDocument`] | The list projection used by the sidebar. Never carries the body. |
//! | [`DocumentPatch`] | A partial update. Absent fields are left untouched by the server. |
//! | [`UserInfo`] | A client-safe user profile (no password hash). |
//! | [`Draft`] | A locally persisted copy of unsaved editor content. |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A markdown document owned by exactly one user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    /// Markdown body. `None` until the first save.
    pub content: Option<String>,
    pub is_archived: bool,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Project into the sidebar summary.
    pub fn summary(&self) -> SidebarDocument {
        SidebarDocument {
            id: self.id,
            title: self.title.clone(),
            is_favorite: self.is_favorite,
            updated_at: self.updated_at,
        }
    }
}

/// The sidebar list entry for a document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarDocument {
    pub id: Uuid,
    pub title: String,
    pub is_favorite: bool,
    pub updated_at: DateTime<Utc>,
}

/// Partial update of a document. Only `Some` fields are written.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
}

impl DocumentPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn favorite(is_favorite: bool) -> Self {
        Self {
            is_favorite: Some(is_favorite),
            ..Self::default()
        }
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.is_favorite.is_none()
    }
}

/// User information safe to send to the client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub email_confirmed: bool,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Unsaved editor content kept locally, keyed by [`draft_key`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub content: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// Storage key of the local draft for a document.
pub fn draft_key(id: Uuid) -> String {
    format!("draft-document-{id}")
}
