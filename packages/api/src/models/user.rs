//! # User model
//!
//! [`User`] is the full row of the `users` table, password hash included. It
//! never leaves the server; [`User::to_info`] projects it into the
//! client-safe [`UserInfo`].
//!
//! Emails are stored trimmed and lowercased, see [`normalize_email`].

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use store::UserInfo;
use uuid::Uuid;

/// Full user record from the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub email_confirmed: bool,
    pub image: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Convert to UserInfo for client consumption.
    pub fn to_info(&self) -> UserInfo {
        UserInfo {
            id: self.id,
            display_name: self.display_name.clone(),
            email: self.email.clone(),
            email_confirmed: self.email_confirmed,
            image: self.image.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Fields of a user about to be inserted.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub display_name: String,
    pub email: String,
    pub password_hash: String,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
