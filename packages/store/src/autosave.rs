//! # Autosave controller
//!
//! [`DocumentEditor`] owns the [`DocumentState`] of one open document and turns
//! the stream of edits into two debounced side effects:
//!
//! | Effect | Window | Target |
//! |--------|--------|--------|
//! | Local draft | `draft_debounce_ms` (500) | [`DraftStore`] under `draft-document-{id}` |
//! | Remote save | `save_debounce_ms` (1000) | `PATCH /api/documents/{id}` with `{content}` |
//!
//! The two timers are independent. A remote save whose content equals the
//! last confirmed content is skipped. The save status follows the machine in
//! [`crate::document`] and settles back to `Initial` after
//! `status_reset_ms`; each save takes a sequence number so that the reset
//! timer of an older save never clears the status of a newer one.
//!
//! Failed saves are not retried. The content stays as typed and the next edit
//! re-arms the debounce.
//!
//! Dropping the editor leaves pending timers running, so the last edits are
//! still written and sent. [`DocumentEditor::close`] does the same without
//! waiting out the debounce windows.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use uuid::Uuid;

use crate::client::{ClientResult, DocumentApi};
use crate::config::AutosaveConfig;
use crate::debounce::{debounce, Debounced};
use crate::document::{DocumentState, SaveStatus};
use crate::draft::DraftStore;
use crate::format::format_last_updated;
use crate::models::{draft_key, Document, DocumentPatch, Draft};
use crate::notify::{LogLevel, Notifications};
use crate::observable::Observable;
use crate::render::render_markdown;

/// Editor for one open document.
pub struct DocumentEditor {
    id: Uuid,
    state: Observable<DocumentState>,
    draft: Debounced<String>,
    save: Debounced<String>,
}

impl DocumentEditor {
    /// Fetch a document and open it.
    pub async fn open(
        id: Uuid,
        api: Arc<dyn DocumentApi>,
        drafts: Arc<dyn DraftStore>,
        notifications: Notifications,
        config: &AutosaveConfig,
    ) -> ClientResult<Self> {
        let document = api.get_document(id).await?;
        Ok(Self::new(&document, api, drafts, notifications, config))
    }

    /// Open an already loaded document. Must be called inside a tokio runtime.
    pub fn new(
        document: &Document,
        api: Arc<dyn DocumentApi>,
        drafts: Arc<dyn DraftStore>,
        notifications: Notifications,
        config: &AutosaveConfig,
    ) -> Self {
        let id = document.id;
        let state = Observable::new(DocumentState::from_document(document));

        let saver = Saver {
            id,
            state: state.clone(),
            api,
            notifications,
            status_reset: config.status_reset(),
            sequence: Arc::new(AtomicU64::new(0)),
        };
        let save = debounce(
            move |content: String| {
                let saver = saver.clone();
                async move { saver.save(content).await }
            },
            config.save_debounce(),
        );

        let draft = debounce(
            move |content: String| {
                let drafts = Arc::clone(&drafts);
                async move { write_draft(drafts.as_ref(), id, content).await }
            },
            config.draft_debounce(),
        );

        Self {
            id,
            state,
            draft,
            save,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Apply a change event carrying the full editor content.
    pub fn edit(&self, content: impl Into<String>) {
        let content = content.into();
        self.state.update(|state| state.set_content(content.clone()));
        self.draft.call(content.clone());
        self.save.call(content);
    }

    /// Set the title after a confirmed rename.
    pub fn set_title(&self, title: impl Into<String>) {
        let title = title.into();
        self.state.update(|state| state.title = title);
    }

    pub fn state(&self) -> DocumentState {
        self.state.get()
    }

    pub fn save_status(&self) -> SaveStatus {
        self.state.with(|state| state.save_status)
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.state.with(DocumentState::has_unsaved_changes)
    }

    /// True while either debounce window is still open.
    pub fn is_pending(&self) -> bool {
        self.draft.is_pending() || self.save.is_pending()
    }

    pub fn subscribe(&self) -> watch::Receiver<DocumentState> {
        self.state.subscribe()
    }

    /// "Updated 5m ago" style label for the header, relative to `now`.
    pub fn last_updated_label(&self, now: DateTime<Utc>) -> Option<String> {
        self.state
            .with(|state| state.last_updated_at)
            .map(|at| format_last_updated(at, now))
    }

    /// Write the pending draft and send the pending save now, then close.
    pub async fn close(self) {
        self.draft.flush().await;
        self.save.flush().await;
    }

    /// HTML rendering of the current content.
    pub fn rendered(&self) -> String {
        self.state
            .with(|state| render_markdown(state.content.as_deref().unwrap_or_default()))
    }
}

async fn write_draft(drafts: &dyn DraftStore, id: Uuid, content: String) {
    let draft = Draft {
        content,
        timestamp: Utc::now().timestamp_millis(),
    };
    if let Err(err) = drafts.save(&draft_key(id), &draft).await {
        tracing::warn!(document = %id, error = %err, "failed to write local draft");
    }
}

/// Everything a debounced remote save needs, detached from the editor.
#[derive(Clone)]
struct Saver {
    id: Uuid,
    state: Observable<DocumentState>,
    api: Arc<dyn DocumentApi>,
    notifications: Notifications,
    status_reset: Duration,
    sequence: Arc<AtomicU64>,
}

impl Saver {
    async fn save(&self, content: String) {
        let started = self.state.update(|state| {
            if state.is_saved(&content) {
                return None;
            }
            state.begin_save();
            Some(self.sequence.fetch_add(1, Ordering::SeqCst) + 1)
        });
        let Some(sequence) = started else {
            tracing::debug!(document = %self.id, "content unchanged, skipping save");
            return;
        };

        let patch = DocumentPatch::content(content.clone());
        let result = self.api.update_document(self.id, &patch).await;

        // A newer save owns the status once it has started.
        let latest = self.state.update(|state| {
            let latest = self.sequence.load(Ordering::SeqCst) == sequence;
            match &result {
                Ok(_) if latest => state.succeed(content, Utc::now()),
                Ok(_) if state.save_status == SaveStatus::InProgress => {
                    state.last_saved_content = Some(content);
                }
                Ok(_) => {}
                Err(_) if latest => state.fail(),
                Err(_) => {}
            }
            latest
        });

        if let Err(err) = &result {
            tracing::warn!(document = %self.id, error = %err, "failed to save document");
            if latest {
                self.notifications.push(
                    LogLevel::Warning,
                    "Failed to save document",
                    err.server_message()
                        .unwrap_or("Your changes are kept and will be saved on the next edit."),
                );
            }
        }
        if !latest {
            return;
        }

        let state = self.state.clone();
        let current = Arc::clone(&self.sequence);
        let delay = self.status_reset;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if current.load(Ordering::SeqCst) == sequence {
                state.update(DocumentState::settle);
            }
        });
    }
}
