//! # HTTP client for the document API
//!
//! [`DocumentApi`] and [`SessionApi`] are the seams the client engine talks
//! through; the autosave controller and the sidebar only ever see the traits,
//! so tests substitute scripted implementations. [`HttpClient`] is the real
//! implementation on top of `reqwest`, keeping the session cookie in its
//! cookie store.
//!
//! Any non-2xx response becomes [`ClientError::Status`] carrying the server's
//! `{ message }` (or the status reason phrase when the body has none);
//! connection and decoding failures become [`ClientError::Transport`].

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::models::{Document, DocumentPatch, SidebarDocument, UserInfo};
use crate::wire::{
    CreateDocument, CreatedDocument, DocumentBody, DocumentList, DocumentUpdated, Login, Message,
    Register, SyncUser, UserBody,
};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{0}")]
    Invalid(String),
}

impl ClientError {
    /// HTTP status of a rejected request.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message the server sent with a rejection.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Status { message, .. } => Some(message),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Document CRUD as seen by the client.
#[async_trait]
pub trait DocumentApi: Send + Sync {
    async fn list_documents(&self) -> ClientResult<Vec<SidebarDocument>>;
    async fn create_document(&self, title: &str) -> ClientResult<Uuid>;
    async fn get_document(&self, id: Uuid) -> ClientResult<Document>;
    async fn update_document(&self, id: Uuid, patch: &DocumentPatch) -> ClientResult<DocumentUpdated>;
    async fn delete_document(&self, id: Uuid) -> ClientResult<()>;
}

/// Session lifecycle as seen by the client.
#[async_trait]
pub trait SessionApi: Send + Sync {
    async fn register(&self, email: &str, password: &str, name: &str) -> ClientResult<UserInfo>;
    async fn login(&self, email: &str, password: &str) -> ClientResult<UserInfo>;
    async fn logout(&self) -> ClientResult<()>;
    /// `Ok(None)` when the server reports no session.
    async fn current_user(&self) -> ClientResult<Option<UserInfo>>;
    async fn sync_user(&self, profile: &SyncUser) -> ClientResult<()>;
}

/// `reqwest`-backed API client.
#[derive(Clone, Debug)]
pub struct HttpClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self::with_client(base_url, http))
    }

    /// Use a preconfigured `reqwest` client. It should have a cookie store
    /// for the session to survive between calls.
    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Map a non-2xx response to [`ClientError::Status`].
async fn check(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.json::<Message>().await {
        Ok(body) if !body.message.is_empty() => body.message,
        _ => status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
    };
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    Ok(check(response).await?.json::<T>().await?)
}

#[async_trait]
impl DocumentApi for HttpClient {
    async fn list_documents(&self) -> ClientResult<Vec<SidebarDocument>> {
        let response = self.http.get(self.url("/api/documents")).send().await?;
        Ok(json::<DocumentList>(response).await?.documents)
    }

    async fn create_document(&self, title: &str) -> ClientResult<Uuid> {
        let response = self
            .http
            .post(self.url("/api/documents"))
            .json(&CreateDocument {
                title: title.to_string(),
            })
            .send()
            .await?;
        Ok(json::<CreatedDocument>(response).await?.id)
    }

    async fn get_document(&self, id: Uuid) -> ClientResult<Document> {
        let response = self
            .http
            .get(self.url(&format!("/api/documents/{id}")))
            .send()
            .await?;
        Ok(json::<DocumentBody>(response).await?.document)
    }

    async fn update_document(&self, id: Uuid, patch: &DocumentPatch) -> ClientResult<DocumentUpdated> {
        let response = self
            .http
            .patch(self.url(&format!("/api/documents/{id}")))
            .json(patch)
            .send()
            .await?;
        json(response).await
    }

    async fn delete_document(&self, id: Uuid) -> ClientResult<()> {
        let response = self
            .http
            .delete(self.url(&format!("/api/documents/{id}")))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}

#[async_trait]
impl SessionApi for HttpClient {
    async fn register(&self, email: &str, password: &str, name: &str) -> ClientResult<UserInfo> {
        let response = self
            .http
            .post(self.url("/api/auth/register"))
            .json(&Register {
                email: email.to_string(),
                password: password.to_string(),
                name: name.to_string(),
            })
            .send()
            .await?;
        Ok(json::<UserBody>(response).await?.user)
    }

    async fn login(&self, email: &str, password: &str) -> ClientResult<UserInfo> {
        let response = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&Login {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;
        Ok(json::<UserBody>(response).await?.user)
    }

    async fn logout(&self) -> ClientResult<()> {
        let response = self.http.post(self.url("/api/auth/logout")).send().await?;
        check(response).await?;
        Ok(())
    }

    async fn current_user(&self) -> ClientResult<Option<UserInfo>> {
        let response = self.http.get(self.url("/api/auth/user")).send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        Ok(Some(json::<UserBody>(response).await?.user))
    }

    async fn sync_user(&self, profile: &SyncUser) -> ClientResult<()> {
        let response = self
            .http
            .post(self.url("/api/auth/sync-user"))
            .json(profile)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}
