//! # Application context
//!
//! [`Workspace`] is the one object a frontend constructs at startup. It owns
//! the signed-in user, the sidebar list and the notification feed, and hands
//! out [`DocumentEditor`]s wired to the same API client and draft store.
//! Signing out resets all of it.

use std::sync::Arc;

use uuid::Uuid;

use crate::autosave::DocumentEditor;
use crate::client::{ClientResult, DocumentApi, HttpClient, SessionApi};
use crate::config::StoreConfig;
use crate::draft::DraftStore;
use crate::models::UserInfo;
use crate::notify::{LogLevel, Notifications};
use crate::observable::Observable;
use crate::sidebar::SidebarDocuments;
use crate::wire::SyncUser;

#[derive(Clone)]
pub struct Workspace {
    config: StoreConfig,
    documents: Arc<dyn DocumentApi>,
    session: Arc<dyn SessionApi>,
    drafts: Arc<dyn DraftStore>,
    user: Observable<Option<UserInfo>>,
    sidebar: SidebarDocuments,
    notifications: Notifications,
}

impl Workspace {
    pub fn new(
        config: StoreConfig,
        documents: Arc<dyn DocumentApi>,
        session: Arc<dyn SessionApi>,
        drafts: Arc<dyn DraftStore>,
    ) -> Self {
        let notifications = Notifications::new();
        let sidebar = SidebarDocuments::new(Arc::clone(&documents), notifications.clone());
        Self {
            config,
            documents,
            session,
            drafts,
            user: Observable::new(None),
            sidebar,
            notifications,
        }
    }

    /// Talk to the server at `config.api.base_url` over HTTP.
    pub fn connect(config: StoreConfig, drafts: Arc<dyn DraftStore>) -> ClientResult<Self> {
        let client = Arc::new(HttpClient::new(config.api.base_url.clone())?);
        Ok(Self::new(config, client.clone(), client, drafts))
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn user(&self) -> Option<UserInfo> {
        self.user.get()
    }

    pub fn subscribe_user(&self) -> tokio::sync::watch::Receiver<Option<UserInfo>> {
        self.user.subscribe()
    }

    pub fn sidebar(&self) -> &SidebarDocuments {
        &self.sidebar
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub async fn register(&self, email: &str, password: &str, name: &str) -> ClientResult<UserInfo> {
        let user = self.session.register(email, password, name).await?;
        self.signed_in(user.clone()).await;
        Ok(user)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> ClientResult<UserInfo> {
        let user = match self.session.login(email, password).await {
            Ok(user) => user,
            Err(err) => {
                tracing::warn!(error = %err, "sign-in failed");
                if let Some(message) = err.server_message() {
                    self.notifications
                        .push(LogLevel::Error, "Sign-in failed", message);
                }
                return Err(err);
            }
        };
        self.signed_in(user.clone()).await;
        Ok(user)
    }

    /// Ask the server who is signed in. Loads the sidebar when someone is.
    pub async fn refresh_user(&self) -> ClientResult<Option<UserInfo>> {
        let user = self.session.current_user().await?;
        match user.clone() {
            Some(user) => self.signed_in(user).await,
            None => self.clear(),
        }
        Ok(user)
    }

    /// Push profile fields to the server and re-read the user.
    pub async fn sync_profile(&self, profile: &SyncUser) -> ClientResult<Option<UserInfo>> {
        self.session.sync_user(profile).await?;
        self.refresh_user().await
    }

    /// End the session and drop all per-user state, even if the server call
    /// fails.
    pub async fn sign_out(&self) -> ClientResult<()> {
        let result = self.session.logout().await;
        if let Err(err) = &result {
            tracing::warn!(error = %err, "logout request failed");
        }
        self.clear();
        result
    }

    pub async fn open_document(&self, id: Uuid) -> ClientResult<DocumentEditor> {
        DocumentEditor::open(
            id,
            Arc::clone(&self.documents),
            Arc::clone(&self.drafts),
            self.notifications.clone(),
            &self.config.autosave,
        )
        .await
    }

    async fn signed_in(&self, user: UserInfo) {
        let changed = self.user.with(|current| current.as_ref().map(|u| u.id) != Some(user.id));
        self.user.set(Some(user));
        if changed || !self.sidebar.is_loaded() {
            self.sidebar.load().await;
        }
    }

    fn clear(&self) {
        self.user.set(None);
        self.sidebar.reset();
        self.notifications.clear();
    }
}
