//! Client-side engine for the notebook: shared models and wire types, the
//! autosave controller, the optimistic sidebar list and the HTTP client.
//!
//! Nothing here depends on a UI framework; state lives in [`Observable`]
//! cells that a frontend subscribes to.

pub mod autosave;
pub mod client;
pub mod config;
pub mod debounce;
pub mod document;
pub mod draft;
pub mod format;
pub mod models;
pub mod notify;
pub mod observable;
pub mod render;
pub mod sidebar;
pub mod wire;
pub mod workspace;

#[cfg(test)]
mod testing;

pub use autosave::DocumentEditor;
pub use client::{ClientError, ClientResult, DocumentApi, HttpClient, SessionApi};
pub use config::StoreConfig;
pub use document::{DocumentState, SaveStatus};
pub use draft::{DraftStore, FileDraftStore, MemoryDraftStore};
pub use models::{Document, DocumentPatch, Draft, SidebarDocument, UserInfo};
pub use notify::{LogLevel, Notification, Notifications};
pub use observable::Observable;
pub use sidebar::{MutationOutcome, SidebarDocuments};
pub use workspace::Workspace;
