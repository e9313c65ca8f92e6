#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use api::repository::{MemoryDocumentRepository, MemoryUserRepository, RepositoryResult};
use api::{AppState, DocumentRepository};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use store::{Document, DocumentPatch, SidebarDocument};
use tower::ServiceExt;
use tower_sessions::MemoryStore;
use uuid::Uuid;

/// Memory repository that counts every call it receives.
#[derive(Default)]
pub struct CountingDocuments {
    inner: MemoryDocumentRepository,
    calls: AtomicUsize,
}

impl CountingDocuments {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentRepository for CountingDocuments {
    async fn list(&self, owner: Uuid) -> RepositoryResult<Vec<SidebarDocument>> {
        self.hit();
        self.inner.list(owner).await
    }

    async fn create(&self, owner: Uuid, title: &str) -> RepositoryResult<Uuid> {
        self.hit();
        self.inner.create(owner, title).await
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> RepositoryResult<Option<Document>> {
        self.hit();
        self.inner.get(owner, id).await
    }

    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: &DocumentPatch,
    ) -> RepositoryResult<Option<DateTime<Utc>>> {
        self.hit();
        self.inner.update(owner, id, patch).await
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> RepositoryResult<bool> {
        self.hit();
        self.inner.delete(owner, id).await
    }
}

pub struct TestApp {
    pub router: Router,
    pub users: Arc<MemoryUserRepository>,
    pub documents: Arc<CountingDocuments>,
}

pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
    pub cookie: Option<String>,
}

impl TestApp {
    pub fn new() -> Self {
        let users = Arc::new(MemoryUserRepository::new());
        let documents = Arc::new(CountingDocuments::default());
        let state = AppState::new(users.clone(), documents.clone());
        let router = api::router(state).layer(api::auth::session_layer(
            MemoryStore::default(),
            &api::settings::Session::default(),
        ));
        Self {
            router,
            users,
            documents,
        }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> Reply {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> Reply {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_string);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        Reply {
            status,
            body,
            cookie,
        }
    }

    /// Register a fresh account and return its session cookie.
    pub async fn sign_up(&self, email: &str) -> String {
        let reply = self
            .send(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({ "email": email, "password": "password1", "name": "Tester" })),
            )
            .await;
        assert_eq!(reply.status, StatusCode::CREATED);
        reply.cookie.expect("session cookie")
    }

    pub async fn create_document(&self, cookie: &str, title: &str) -> String {
        let reply = self
            .send(
                Method::POST,
                "/api/documents",
                Some(cookie),
                Some(json!({ "title": title })),
            )
            .await;
        assert_eq!(reply.status, StatusCode::CREATED);
        reply.body["id"].as_str().unwrap().to_string()
    }
}
