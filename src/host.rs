//! Host application abstraction.
//!
//! The note application (storage, selection state, panel runtime, dialogs)
//! is an external collaborator; everything the plugin needs from it goes
//! through the [`Host`] trait. Every call is async: host calls suspend the
//! current handler until the host responds, and the single-consumer event
//! loop guarantees no two handlers ever interleave.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by host calls.
#[derive(Debug, Error)]
pub enum HostError {
    /// The referenced note or folder no longer exists.
    ///
    /// Callers treat this as "delete the stale tab and continue"; it is
    /// never surfaced to the user.
    #[error("note or folder not found")]
    NotFound,

    /// Any other host-side failure.
    #[error("host call failed: {0}")]
    Failed(String),
}

/// Change type tag of a note-change event, using the host's integer codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteChangeKind {
    Created,
    Updated,
    Deleted,
}

impl TryFrom<u8> for NoteChangeKind {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(NoteChangeKind::Created),
            2 => Ok(NoteChangeKind::Updated),
            3 => Ok(NoteChangeKind::Deleted),
            other => Err(format!("invalid note change code: {other}")),
        }
    }
}

/// Read-only note projection: only the fields the panel asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDetails {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub is_todo: bool,
    /// Completion timestamp in milliseconds; 0 means not completed.
    #[serde(default)]
    pub todo_completed: i64,
    /// Folder the note lives in; `None` when unfiled.
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl NoteDetails {
    /// Whether the note is a to-do that has been completed.
    pub fn is_completed_todo(&self) -> bool {
        self.is_todo && self.todo_completed != 0
    }
}

/// Read-only folder projection for the breadcrumb parent chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub title: String,
    /// `None` for top-level folders.
    #[serde(default)]
    pub parent_id: Option<String>,
}

/// Interface to the note application.
#[async_trait]
pub trait Host: Send + Sync {
    /// Fetch a note by id. `HostError::NotFound` marks a stale tab.
    async fn note(&self, id: &str) -> Result<NoteDetails, HostError>;

    /// Update a note's completion timestamp (0 clears it).
    async fn set_todo_completed(&self, id: &str, completed: i64) -> Result<(), HostError>;

    /// Fetch a folder by id.
    async fn folder(&self, id: &str) -> Result<Folder, HostError>;

    /// The currently selected note, if any.
    async fn selected_note(&self) -> Result<Option<NoteDetails>, HostError>;

    /// Ids of all selected notes (multi-selection).
    async fn selected_note_ids(&self) -> Result<Vec<String>, HostError>;

    /// Select (open) the given note in the editor.
    async fn select_note(&self, id: &str) -> Result<(), HostError>;

    /// Reveal the given folder in the sidebar.
    async fn open_folder(&self, id: &str) -> Result<(), HostError>;

    /// Navigate back in the host's note history.
    async fn history_back(&self) -> Result<(), HostError>;

    /// Navigate forward in the host's note history.
    async fn history_forward(&self) -> Result<(), HostError>;

    /// Host-global "show completed to-dos" preference.
    async fn show_completed_todos(&self) -> Result<bool, HostError>;

    /// Replace the panel's HTML document.
    async fn set_panel_html(&self, html: &str) -> Result<(), HostError>;

    /// Whether the panel is currently visible.
    async fn panel_visible(&self) -> Result<bool, HostError>;

    /// Show or hide the panel.
    async fn show_panel(&self, visible: bool) -> Result<(), HostError>;

    /// Modal confirmation dialog; `true` when the user accepts.
    async fn confirm(&self, message: &str) -> Result<bool, HostError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_change_codes_decode() {
        assert_eq!(NoteChangeKind::try_from(1).unwrap(), NoteChangeKind::Created);
        assert_eq!(NoteChangeKind::try_from(2).unwrap(), NoteChangeKind::Updated);
        assert_eq!(NoteChangeKind::try_from(3).unwrap(), NoteChangeKind::Deleted);
        assert!(NoteChangeKind::try_from(0).is_err());
    }

    #[test]
    fn completed_todo_requires_both_flags() {
        let mut note = NoteDetails {
            id: "a".into(),
            title: "t".into(),
            is_todo: false,
            todo_completed: 0,
            parent_id: None,
        };
        assert!(!note.is_completed_todo());
        note.todo_completed = 1700000000000;
        assert!(!note.is_completed_todo());
        note.is_todo = true;
        assert!(note.is_completed_todo());
        note.todo_completed = 0;
        assert!(!note.is_completed_todo());
    }
}
