use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use store::wire::SyncUser;
use store::{Document, DocumentPatch, SidebarDocument};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{DocumentRepository, RepositoryError, RepositoryResult, UserRepository};
use crate::models::{NewUser, User};

#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop a user, as an operator would. Not reachable over HTTP.
    pub async fn remove(&self, id: Uuid) -> Option<User> {
        self.users.write().await.remove(&id)
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, user: NewUser) -> RepositoryResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict(format!("user {}", user.email)));
        }
        let now = Utc::now();
        let row = User {
            id: Uuid::new_v4(),
            display_name: user.display_name,
            email: user.email,
            email_confirmed: false,
            image: None,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        users.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn sync_profile(&self, id: Uuid, profile: &SyncUser) -> RepositoryResult<Option<User>> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &profile.display_name {
            user.display_name = name.clone();
        }
        if let Some(image) = &profile.image {
            user.image = Some(image.clone());
        }
        if let Some(confirmed) = profile.email_confirmed {
            user.email_confirmed = confirmed;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }
}

#[derive(Debug, Default)]
pub struct MemoryDocumentRepository {
    documents: RwLock<HashMap<Uuid, Document>>,
}

impl MemoryDocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }
}

#[async_trait]
impl DocumentRepository for MemoryDocumentRepository {
    async fn list(&self, owner: Uuid) -> RepositoryResult<Vec<SidebarDocument>> {
        let documents = self.documents.read().await;
        let mut list: Vec<SidebarDocument> = documents
            .values()
            .filter(|doc| doc.user_id == owner)
            .map(Document::summary)
            .collect();
        list.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(list)
    }

    async fn create(&self, owner: Uuid, title: &str) -> RepositoryResult<Uuid> {
        let now = Utc::now();
        let document = Document {
            id: Uuid::new_v4(),
            user_id: owner,
            title: title.to_string(),
            content: None,
            is_archived: false,
            is_favorite: false,
            created_at: now,
            updated_at: now,
        };
        let id = document.id;
        self.documents.write().await.insert(id, document);
        Ok(id)
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> RepositoryResult<Option<Document>> {
        Ok(self
            .documents
            .read()
            .await
            .get(&id)
            .filter(|doc| doc.user_id == owner)
            .cloned())
    }

    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: &DocumentPatch,
    ) -> RepositoryResult<Option<DateTime<Utc>>> {
        let mut documents = self.documents.write().await;
        let Some(doc) = documents.get_mut(&id).filter(|doc| doc.user_id == owner) else {
            return Ok(None);
        };
        if let Some(title) = &patch.title {
            doc.title = title.clone();
        }
        if let Some(content) = &patch.content {
            doc.content = Some(content.clone());
        }
        if let Some(is_favorite) = patch.is_favorite {
            doc.is_favorite = is_favorite;
        }
        doc.updated_at = Utc::now();
        Ok(Some(doc.updated_at))
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> RepositoryResult<bool> {
        let mut documents = self.documents.write().await;
        if documents.get(&id).is_some_and(|doc| doc.user_id == owner) {
            documents.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_documents_are_owner_scoped() {
        let repo = MemoryDocumentRepository::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let id = repo.create(alice, "Plan").await.unwrap();

        assert!(repo.get(bob, id).await.unwrap().is_none());
        assert!(repo
            .update(bob, id, &DocumentPatch::content("x"))
            .await
            .unwrap()
            .is_none());
        assert!(!repo.delete(bob, id).await.unwrap());
        assert!(repo.list(bob).await.unwrap().is_empty());

        assert_eq!(repo.list(alice).await.unwrap().len(), 1);
        assert!(repo.delete(alice, id).await.unwrap());
        assert_eq!(repo.len().await, 0);
    }

    #[tokio::test]
    async fn test_update_restamps_and_reorders() {
        let repo = MemoryDocumentRepository::new();
        let owner = Uuid::new_v4();
        let first = repo.create(owner, "First").await.unwrap();
        let second = repo.create(owner, "Second").await.unwrap();

        let stamped = repo
            .update(owner, first, &DocumentPatch::content(""))
            .await
            .unwrap()
            .unwrap();

        let list = repo.list(owner).await.unwrap();
        assert_eq!(list[0].id, first);
        assert_eq!(list[0].updated_at, stamped);
        assert_eq!(list[1].id, second);
        let doc = repo.get(owner, first).await.unwrap().unwrap();
        assert_eq!(doc.content.as_deref(), Some(""));
        assert_eq!(doc.title, "First");
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let repo = MemoryUserRepository::new();
        let new = NewUser {
            display_name: "Ada".into(),
            email: "ada@example.com".into(),
            password_hash: "h".into(),
        };
        let user = repo.create(new.clone()).await.unwrap();
        assert!(matches!(
            repo.create(new).await,
            Err(RepositoryError::Conflict(_))
        ));

        let profile = SyncUser {
            display_name: Some("Ada L.".into()),
            ..SyncUser::default()
        };
        let synced = repo.sync_profile(user.id, &profile).await.unwrap().unwrap();
        assert_eq!(synced.display_name, "Ada L.");
        assert!(synced.updated_at >= user.updated_at);
    }
}
