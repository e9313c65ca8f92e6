//! # Sidebar document list with optimistic mutations
//!
//! [`SidebarDocuments`] holds the caller's document summaries (`None` until
//! loaded) and applies favorite toggles and renames before the server
//! confirms them.
//!
//! ## Optimistic protocol
//!
//! 1. Snapshot the whole list.
//! 2. Replace it with `[updated, ...list_without_item]`; the touched item
//!    moves to the front.
//! 3. `PATCH` the server.
//! 4. On success, notify; the list is already right.
//! 5. On failure, notify and roll back.
//!
//! Each item also keeps its last confirmed title and favorite flag, taken
//! from the server list and updated by every successful mutation. A failed
//! mutation restores the item to that confirmed value, never to another
//! mutation's optimistic one. When the list has not changed since the
//! mutation, the snapshot's order comes back too.
//!
//! A failure that arrives while a newer mutation of the same item is still
//! in flight is stale: the newer mutation owns the item. Once the last
//! mutation of an item settles, the item shows its confirmed value.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::client::{ClientError, DocumentApi};
use crate::models::{DocumentPatch, SidebarDocument};
use crate::notify::{LogLevel, Notifications};
use crate::observable::Observable;

/// What happened to an optimistic mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The server confirmed the change.
    Applied,
    /// The server rejected the change and local state was restored.
    RolledBack,
    /// The server rejected the change but a newer mutation owns the item.
    Stale,
    /// Nothing was done: list not loaded, unknown id, or no-op input.
    Skipped,
}

/// Snapshot of the sidebar published to subscribers.
#[derive(Clone, Debug, Default)]
pub struct SidebarList {
    pub documents: Option<Vec<SidebarDocument>>,
    revision: u64,
    items: HashMap<Uuid, Tracking>,
}

/// Server-confirmed fields of one item.
#[derive(Clone, Debug, PartialEq)]
struct Confirmed {
    title: String,
    is_favorite: bool,
}

impl Confirmed {
    fn of(doc: &SidebarDocument) -> Self {
        Self {
            title: doc.title.clone(),
            is_favorite: doc.is_favorite,
        }
    }
}

#[derive(Clone, Debug)]
struct Tracking {
    confirmed: Confirmed,
    /// Revision of the newest mutation of the item.
    latest: u64,
    /// Mutations of the item still waiting for the server.
    in_flight: u32,
}

impl Tracking {
    fn new(doc: &SidebarDocument) -> Self {
        Self {
            confirmed: Confirmed::of(doc),
            latest: 0,
            in_flight: 0,
        }
    }
}

/// Bookkeeping for one in-flight optimistic mutation.
struct Pending {
    snapshot: Vec<SidebarDocument>,
    previous: SidebarDocument,
    revision: u64,
}

/// The sidebar list.
#[derive(Clone)]
pub struct SidebarDocuments {
    list: Observable<SidebarList>,
    api: Arc<dyn DocumentApi>,
    notifications: Notifications,
}

impl SidebarDocuments {
    pub fn new(api: Arc<dyn DocumentApi>, notifications: Notifications) -> Self {
        Self {
            list: Observable::default(),
            api,
            notifications,
        }
    }

    /// Fetch the list from the server. A failure leaves an empty list.
    pub async fn load(&self) {
        let documents = match self.api.list_documents().await {
            Ok(documents) => documents,
            Err(err) => {
                tracing::error!(error = %err, "failed to load documents");
                Vec::new()
            }
        };
        self.replace(Some(documents));
    }

    /// Set the list directly. `None` marks it as not loaded.
    pub fn replace(&self, documents: Option<Vec<SidebarDocument>>) {
        self.list.update(|list| {
            match &documents {
                Some(docs) => {
                    list.items.retain(|id, _| docs.iter().any(|doc| doc.id == *id));
                    for doc in docs {
                        list.items
                            .entry(doc.id)
                            .and_modify(|item| item.confirmed = Confirmed::of(doc))
                            .or_insert_with(|| Tracking::new(doc));
                    }
                }
                None => list.items.clear(),
            }
            list.documents = documents;
            list.revision += 1;
        });
    }

    /// Forget everything (sign-out).
    pub fn reset(&self) {
        self.list.set(SidebarList::default());
    }

    pub fn documents(&self) -> Option<Vec<SidebarDocument>> {
        self.list.with(|list| list.documents.clone())
    }

    pub fn is_loaded(&self) -> bool {
        self.list.with(|list| list.documents.is_some())
    }

    pub fn find(&self, id: Uuid) -> Option<SidebarDocument> {
        self.list.with(|list| {
            list.documents
                .as_ref()?
                .iter()
                .find(|doc| doc.id == id)
                .cloned()
        })
    }

    pub fn favorites(&self) -> Option<Vec<SidebarDocument>> {
        self.filtered(|doc| doc.is_favorite)
    }

    /// Documents that are not favorites.
    pub fn workspace(&self) -> Option<Vec<SidebarDocument>> {
        self.filtered(|doc| !doc.is_favorite)
    }

    pub fn count(&self) -> usize {
        self.list
            .with(|list| list.documents.as_ref().map_or(0, Vec::len))
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<SidebarList> {
        self.list.subscribe()
    }

    fn filtered(&self, keep: impl Fn(&SidebarDocument) -> bool) -> Option<Vec<SidebarDocument>> {
        self.list.with(|list| {
            list.documents
                .as_ref()
                .map(|docs| docs.iter().filter(|doc| keep(doc)).cloned().collect())
        })
    }

    /// Flip the favorite flag of a document.
    pub async fn toggle_favorite(&self, id: Uuid) -> MutationOutcome {
        let Some(pending) = self.apply(id, |doc| doc.is_favorite = !doc.is_favorite) else {
            return MutationOutcome::Skipped;
        };
        let item = &pending.previous;
        let was_favorite = item.is_favorite;

        let patch = DocumentPatch::favorite(!was_favorite);
        match self.api.update_document(id, &patch).await {
            Ok(_) => {
                self.confirm(id, &pending, |confirmed| confirmed.is_favorite = !was_favorite);
                let (title, action) = if was_favorite {
                    ("Removed from Favorites", "removed from")
                } else {
                    ("Added to Favorites", "added to")
                };
                self.notifications.push(
                    LogLevel::Success,
                    title,
                    format!("The document: {} is now {action} Favorites.", item.title),
                );
                MutationOutcome::Applied
            }
            Err(err) => {
                tracing::error!(document = %id, error = %err, "failed to update favorite status");
                self.report(
                    &err,
                    "Failed to update Favorite status",
                    "Internal server error while updating the favorite status",
                );
                self.roll_back(id, pending)
            }
        }
    }

    /// Rename a document. Blank or unchanged titles are ignored.
    pub async fn rename(&self, id: Uuid, title: &str) -> MutationOutcome {
        let title = title.trim();
        if title.is_empty() || self.find(id).is_some_and(|doc| doc.title == title) {
            return MutationOutcome::Skipped;
        }
        let Some(pending) = self.apply(id, |doc| doc.title = title.to_string()) else {
            return MutationOutcome::Skipped;
        };

        match self.api.update_document(id, &DocumentPatch::title(title)).await {
            Ok(_) => {
                self.confirm(id, &pending, |confirmed| confirmed.title = title.to_string());
                self.notifications.push(
                    LogLevel::Success,
                    "Document renamed",
                    format!("{} is now {title}.", pending.previous.title),
                );
                MutationOutcome::Applied
            }
            Err(err) => {
                tracing::error!(document = %id, error = %err, "failed to rename document");
                self.report(
                    &err,
                    "Failed to rename document",
                    "Internal server error while renaming the document",
                );
                self.roll_back(id, pending)
            }
        }
    }

    /// Create a document and put it at the top of the list.
    pub async fn create_document(&self, title: &str) -> Result<Uuid, ClientError> {
        let title = title.trim();
        if title.is_empty() {
            self.notifications.push(
                LogLevel::Warning,
                "Document title can not be empty",
                "Please enter a valid title before proceeding.",
            );
            return Err(ClientError::Invalid("Title is required".into()));
        }

        match self.api.create_document(title).await {
            Ok(id) => {
                let summary = SidebarDocument {
                    id,
                    title: title.to_string(),
                    is_favorite: false,
                    updated_at: Utc::now(),
                };
                self.list.update(|list| {
                    if let Some(documents) = list.documents.as_mut() {
                        list.items.insert(id, Tracking::new(&summary));
                        documents.insert(0, summary);
                        list.revision += 1;
                    }
                });
                Ok(id)
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to create document");
                self.report(
                    &err,
                    "Document creation failed",
                    "We could not process the request. Please try after some time.",
                );
                Err(err)
            }
        }
    }

    /// Delete a document; it leaves the list only once the server confirms.
    pub async fn delete_document(&self, id: Uuid) -> Result<(), ClientError> {
        match self.api.delete_document(id).await {
            Ok(()) => {
                self.list.update(|list| {
                    if let Some(documents) = list.documents.as_mut() {
                        documents.retain(|doc| doc.id != id);
                        list.revision += 1;
                    }
                    list.items.remove(&id);
                });
                Ok(())
            }
            Err(err) => {
                tracing::error!(document = %id, error = %err, "failed to delete document");
                self.report(
                    &err,
                    "Failed to delete",
                    "There was a problem deleting the document. Please try again.",
                );
                Err(err)
            }
        }
    }

    /// Optimistically apply `change` to `id`, moving it to the front.
    fn apply(&self, id: Uuid, change: impl FnOnce(&mut SidebarDocument)) -> Option<Pending> {
        self.list.update(|list| {
            let documents = list.documents.as_mut()?;
            let index = documents.iter().position(|doc| doc.id == id)?;

            let snapshot = documents.clone();
            let previous = documents.remove(index);
            let mut updated = previous.clone();
            change(&mut updated);
            documents.insert(0, updated);

            list.revision += 1;
            let item = list
                .items
                .entry(id)
                .or_insert_with(|| Tracking::new(&previous));
            item.latest = list.revision;
            item.in_flight += 1;

            Some(Pending {
                snapshot,
                previous,
                revision: list.revision,
            })
        })
    }

    /// Record a mutation the server accepted.
    fn confirm(&self, id: Uuid, pending: &Pending, accept: impl FnOnce(&mut Confirmed)) {
        self.list.update(|list| {
            let Some(item) = list.items.get_mut(&id) else {
                return;
            };
            accept(&mut item.confirmed);
            item.in_flight = item.in_flight.saturating_sub(1);
            if item.in_flight == 0 && item.latest != pending.revision {
                // A newer mutation already failed back to the old value.
                let confirmed = item.confirmed.clone();
                show_confirmed(list, id, &confirmed);
            }
        });
    }

    /// Undo a mutation the server rejected.
    fn roll_back(&self, id: Uuid, pending: Pending) -> MutationOutcome {
        self.list.update(|list| {
            let Some(item) = list.items.get_mut(&id) else {
                return MutationOutcome::Stale;
            };
            item.in_flight = item.in_flight.saturating_sub(1);
            let newest = item.latest == pending.revision;
            let settled = item.in_flight == 0;
            let confirmed = item.confirmed.clone();

            if newest && list.revision == pending.revision {
                list.documents = Some(pending.snapshot);
                list.revision += 1;
            }
            if newest || settled {
                show_confirmed(list, id, &confirmed);
            }
            if newest {
                MutationOutcome::RolledBack
            } else {
                MutationOutcome::Stale
            }
        })
    }

    fn report(&self, err: &ClientError, title: &str, fallback: &str) {
        match err.server_message() {
            Some(message) => self.notifications.push(LogLevel::Error, title, message),
            None => self
                .notifications
                .push(LogLevel::Error, "Something went wrong", fallback),
        }
    }
}

/// Put the confirmed fields of `id` back on display.
fn show_confirmed(list: &mut SidebarList, id: Uuid, confirmed: &Confirmed) {
    let Some(doc) = list
        .documents
        .as_mut()
        .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id))
    else {
        return;
    };
    if doc.title != confirmed.title || doc.is_favorite != confirmed.is_favorite {
        doc.title = confirmed.title.clone();
        doc.is_favorite = confirmed.is_favorite;
        list.revision += 1;
    }
}
