//! Client-side state of the open document and its save status machine.
//!
//! ```text
//! Initial ──begin──▶ InProgress ──succeed──▶ Success ──settle──▶ Initial
//!                        │                                          ▲
//!                        └──────fail──────▶ Failed ───settle────────┘
//! ```
//!
//! [`DocumentState::begin_save`] called while a previous outcome is still
//! displayed settles it first, so `InProgress` is only ever entered from
//! `Initial`. A save that starts while another is in flight leaves the
//! status at `InProgress`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Document;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SaveStatus {
    #[default]
    Initial,
    InProgress,
    Success,
    Failed,
}

impl SaveStatus {
    /// Whether `self → next` is an edge of the status machine.
    pub fn can_transition_to(self, next: SaveStatus) -> bool {
        use SaveStatus::*;
        matches!(
            (self, next),
            (Initial, InProgress)
                | (InProgress, Success)
                | (InProgress, Failed)
                | (Success, Initial)
                | (Failed, Initial)
        )
    }
}

/// State of one open document.
#[derive(Clone, Debug, PartialEq)]
pub struct DocumentState {
    pub id: Uuid,
    pub title: String,
    pub content: Option<String>,
    /// Content last confirmed by the server.
    pub last_saved_content: Option<String>,
    pub save_status: SaveStatus,
    pub last_updated_at: Option<DateTime<Utc>>,
}

impl DocumentState {
    pub fn new(id: Uuid, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            content: None,
            last_saved_content: None,
            save_status: SaveStatus::Initial,
            last_updated_at: None,
        }
    }

    /// State for a freshly loaded document: nothing is unsaved.
    pub fn from_document(document: &Document) -> Self {
        Self {
            id: document.id,
            title: document.title.clone(),
            content: document.content.clone(),
            last_saved_content: document.content.clone(),
            save_status: SaveStatus::Initial,
            last_updated_at: Some(document.updated_at),
        }
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.content != self.last_saved_content
    }

    /// True if `content` is exactly what the server already holds.
    pub fn is_saved(&self, content: &str) -> bool {
        self.last_saved_content.as_deref() == Some(content)
    }

    pub fn set_content(&mut self, content: String) {
        self.content = Some(content);
    }

    /// Enter `InProgress`, settling a displayed outcome first.
    pub fn begin_save(&mut self) {
        match self.save_status {
            SaveStatus::InProgress => {}
            SaveStatus::Initial => self.transition(SaveStatus::InProgress),
            SaveStatus::Success | SaveStatus::Failed => {
                self.transition(SaveStatus::Initial);
                self.transition(SaveStatus::InProgress);
            }
        }
    }

    /// Record a confirmed save of `content`.
    pub fn succeed(&mut self, content: String, at: DateTime<Utc>) {
        self.transition(SaveStatus::Success);
        self.last_saved_content = Some(content);
        self.last_updated_at = Some(at);
    }

    /// Record a failed save. Content and last-saved content stay as they are.
    pub fn fail(&mut self) {
        self.transition(SaveStatus::Failed);
    }

    /// Return a displayed outcome to `Initial`.
    pub fn settle(&mut self) {
        if matches!(self.save_status, SaveStatus::Success | SaveStatus::Failed) {
            self.transition(SaveStatus::Initial);
        }
    }

    fn transition(&mut self, next: SaveStatus) {
        debug_assert!(
            self.save_status.can_transition_to(next),
            "invalid save status transition {:?} -> {:?}",
            self.save_status,
            next
        );
        self.save_status = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> DocumentState {
        let mut state = DocumentState::new(Uuid::new_v4(), "Notes");
        state.last_saved_content = Some("saved".into());
        state.content = Some("saved".into());
        state
    }

    #[test]
    fn test_transition_table() {
        use SaveStatus::*;
        assert!(Initial.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Success));
        assert!(InProgress.can_transition_to(Failed));
        assert!(Success.can_transition_to(Initial));
        assert!(Failed.can_transition_to(Initial));

        assert!(!Initial.can_transition_to(Success));
        assert!(!Initial.can_transition_to(Failed));
        assert!(!Success.can_transition_to(InProgress));
        assert!(!Failed.can_transition_to(InProgress));
        assert!(!InProgress.can_transition_to(Initial));
    }

    #[test]
    fn test_success_records_saved_content() {
        let mut state = state();
        state.set_content("edited".into());
        assert!(state.has_unsaved_changes());

        state.begin_save();
        assert_eq!(state.save_status, SaveStatus::InProgress);

        let at = Utc::now();
        state.succeed("edited".into(), at);
        assert_eq!(state.save_status, SaveStatus::Success);
        assert_eq!(state.last_saved_content.as_deref(), Some("edited"));
        assert_eq!(state.last_updated_at, Some(at));
        assert!(!state.has_unsaved_changes());

        state.settle();
        assert_eq!(state.save_status, SaveStatus::Initial);
    }

    #[test]
    fn test_failure_keeps_content() {
        let mut state = state();
        state.set_content("edited".into());
        state.begin_save();
        state.fail();

        assert_eq!(state.save_status, SaveStatus::Failed);
        assert_eq!(state.content.as_deref(), Some("edited"));
        assert_eq!(state.last_saved_content.as_deref(), Some("saved"));
        assert!(state.has_unsaved_changes());
    }

    #[test]
    fn test_begin_save_settles_displayed_outcome() {
        let mut state = state();
        state.begin_save();
        state.fail();
        state.begin_save();
        assert_eq!(state.save_status, SaveStatus::InProgress);
    }

    #[test]
    fn test_overlapping_saves_stay_in_progress() {
        let mut state = state();
        state.begin_save();
        state.begin_save();
        assert_eq!(state.save_status, SaveStatus::InProgress);
    }

    #[test]
    fn test_settle_is_noop_when_idle_or_busy() {
        let mut state = state();
        state.settle();
        assert_eq!(state.save_status, SaveStatus::Initial);
        state.begin_save();
        state.settle();
        assert_eq!(state.save_status, SaveStatus::InProgress);
    }
}
