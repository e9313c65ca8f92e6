//! Scripted API double for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::client::{ClientError, ClientResult, DocumentApi, SessionApi};
use crate::models::{Document, DocumentPatch, SidebarDocument, UserInfo};
use crate::wire::{DocumentUpdated, SyncUser};

/// Outcome of the next mutating call.
#[derive(Clone, Debug)]
pub enum Reply {
    Ok,
    Status(u16, &'static str),
    Offline,
}

impl Reply {
    fn into_result(self) -> ClientResult<()> {
        match self {
            Reply::Ok => Ok(()),
            Reply::Status(status, message) => Err(ClientError::Status {
                status,
                message: message.to_string(),
            }),
            Reply::Offline => Err(ClientError::Invalid("connection refused".into())),
        }
    }
}

#[derive(Default)]
pub struct MockApi {
    pub documents: Mutex<Vec<SidebarDocument>>,
    pub document: Mutex<Option<Document>>,
    pub updates: Mutex<Vec<(Uuid, DocumentPatch)>>,
    pub deletes: Mutex<Vec<Uuid>>,
    pub creates: Mutex<Vec<String>>,
    pub user: Mutex<Option<UserInfo>>,
    script: Mutex<VecDeque<Reply>>,
    gate: Mutex<Option<Arc<Semaphore>>>,
}

impl MockApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue the outcome of the next mutating call. Unscripted calls succeed.
    pub fn reply(&self, reply: Reply) {
        self.script.lock().unwrap().push_back(reply);
    }

    /// Make updates wait until [`MockApi::release`] lets them through.
    pub fn hold_updates(&self) {
        *self.gate.lock().unwrap() = Some(Arc::new(Semaphore::new(0)));
    }

    pub fn release(&self, n: usize) {
        if let Some(gate) = self.gate.lock().unwrap().as_ref() {
            gate.add_permits(n);
        }
    }

    pub fn update_count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }

    pub fn sent_contents(&self) -> Vec<String> {
        self.updates
            .lock()
            .unwrap()
            .iter()
            .filter_map(|(_, patch)| patch.content.clone())
            .collect()
    }

    fn next(&self) -> ClientResult<()> {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Reply::Ok)
            .into_result()
    }
}

#[async_trait]
impl DocumentApi for MockApi {
    async fn list_documents(&self) -> ClientResult<Vec<SidebarDocument>> {
        self.next()?;
        Ok(self.documents.lock().unwrap().clone())
    }

    async fn create_document(&self, title: &str) -> ClientResult<Uuid> {
        self.creates.lock().unwrap().push(title.to_string());
        self.next()?;
        Ok(Uuid::new_v4())
    }

    async fn get_document(&self, _id: Uuid) -> ClientResult<Document> {
        self.next()?;
        self.document
            .lock()
            .unwrap()
            .clone()
            .ok_or(ClientError::Status {
                status: 404,
                message: "not found".into(),
            })
    }

    async fn update_document(&self, id: Uuid, patch: &DocumentPatch) -> ClientResult<DocumentUpdated> {
        self.updates.lock().unwrap().push((id, patch.clone()));
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.acquire().await.unwrap().forget();
        }
        self.next()?;
        Ok(DocumentUpdated {
            message: "Document updated successfully!".into(),
            updated_at: Utc::now(),
        })
    }

    async fn delete_document(&self, id: Uuid) -> ClientResult<()> {
        self.deletes.lock().unwrap().push(id);
        self.next()
    }
}

#[async_trait]
impl SessionApi for MockApi {
    async fn register(&self, _email: &str, _password: &str, _name: &str) -> ClientResult<UserInfo> {
        self.next()?;
        self.user
            .lock()
            .unwrap()
            .clone()
            .ok_or(ClientError::Invalid("no user".into()))
    }

    async fn login(&self, email: &str, password: &str) -> ClientResult<UserInfo> {
        self.register(email, password, "").await
    }

    async fn logout(&self) -> ClientResult<()> {
        self.next()
    }

    async fn current_user(&self) -> ClientResult<Option<UserInfo>> {
        self.next()?;
        Ok(self.user.lock().unwrap().clone())
    }

    async fn sync_user(&self, _profile: &SyncUser) -> ClientResult<()> {
        self.next()
    }
}

pub fn summary(title: &str, is_favorite: bool) -> SidebarDocument {
    SidebarDocument {
        id: Uuid::new_v4(),
        title: title.to_string(),
        is_favorite,
        updated_at: Utc::now(),
    }
}

pub fn document(content: Option<&str>) -> Document {
    let now = Utc::now();
    Document {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        title: "Draft".to_string(),
        content: content.map(str::to_string),
        is_archived: false,
        is_favorite: false,
        created_at: now,
        updated_at: now,
    }
}

pub fn user() -> UserInfo {
    let now = Utc::now();
    UserInfo {
        id: Uuid::new_v4(),
        display_name: "Ada".into(),
        email: "ada@example.com".into(),
        email_confirmed: false,
        image: None,
        created_at: now,
        updated_at: now,
    }
}
