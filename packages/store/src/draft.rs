//! # Local draft storage
//!
//! The autosave controller writes the editor content here on a short
//! debounce so that a crash or reload leaves a recent copy behind. Drafts are
//! keyed by [`draft_key`](crate::models::draft_key) (`draft-document-{id}`).
//! The editor never reads drafts back; [`DraftStore::load`] exists for
//! recovery tooling and tests.
//!
//! Two implementations:
//!
//! - [`MemoryDraftStore`]: process-local, for tests and ephemeral sessions.
//! - [`FileDraftStore`]: one JSON file per key under a base directory.
//!
//! ## File layout
//!
//! ```text
//! <base_dir>/
//! └── drafts/
//!     └── draft-document-<uuid>.json   # {"content": "...", "timestamp": 1700000000000}
//! ```
//!
//! [`FileDraftStore::default_dir`] resolves `<data_dir>/notebook` through
//! [`dirs::data_dir`]:
//!
//! | Platform | Path |
//! |----------|------|
//! | macOS | `~/Library/Application Support/notebook/` |
//! | Linux | `~/.local/share/notebook/` |
//! | Windows | `C:\Users\<user>\AppData\Roaming\notebook\` |

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::models::Draft;

#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("draft io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("draft encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Key-value store for local drafts.
#[async_trait]
pub trait DraftStore: Send + Sync {
    async fn save(&self, key: &str, draft: &Draft) -> Result<(), DraftError>;
    async fn load(&self, key: &str) -> Result<Option<Draft>, DraftError>;
}

/// In-memory DraftStore.
#[derive(Clone, Debug, Default)]
pub struct MemoryDraftStore {
    drafts: Arc<Mutex<HashMap<String, Draft>>>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of drafts currently stored.
    pub fn len(&self) -> usize {
        self.drafts().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn drafts(&self) -> MutexGuard<'_, HashMap<String, Draft>> {
        // A panic elsewhere leaves the map intact.
        self.drafts.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl DraftStore for MemoryDraftStore {
    async fn save(&self, key: &str, draft: &Draft) -> Result<(), DraftError> {
        self.drafts().insert(key.to_string(), draft.clone());
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<Draft>, DraftError> {
        Ok(self.drafts().get(key).cloned())
    }
}

/// Filesystem-backed DraftStore.
#[derive(Clone, Debug)]
pub struct FileDraftStore {
    base: PathBuf,
}

impl FileDraftStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    /// Platform data directory for drafts, if one exists.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("notebook"))
    }

    fn drafts_dir(&self) -> PathBuf {
        self.base.join("drafts")
    }

    fn draft_path(&self, key: &str) -> PathBuf {
        self.drafts_dir().join(format!("{key}.json"))
    }
}

#[async_trait]
impl DraftStore for FileDraftStore {
    async fn save(&self, key: &str, draft: &Draft) -> Result<(), DraftError> {
        let bytes = serde_json::to_vec(draft)?;
        tokio::fs::create_dir_all(self.drafts_dir()).await?;
        tokio::fs::write(self.draft_path(key), bytes).await?;
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<Draft>, DraftError> {
        match tokio::fs::read(self.draft_path(key)).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
