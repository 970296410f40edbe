#![allow(dead_code)]

//! Scripted host double for integration tests.
//!
//! Implements the full `Host` trait over a mutex-guarded state bag: tests
//! seed notes/folders/selection up front and inspect the recorded calls
//! (selection requests, panel documents, dialogs) afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use note_tabs::{Folder, Host, HostError, NoteDetails};

#[derive(Default)]
pub struct MockHostState {
    pub notes: HashMap<String, NoteDetails>,
    pub folders: HashMap<String, Folder>,
    pub selected: Option<String>,
    pub selected_ids: Vec<String>,
    pub show_completed_todos: bool,
    pub panel_visible: bool,
    pub confirm_answer: bool,
    /// When set, every note fetch fails as if the host were unavailable.
    pub fail_note_fetch: bool,
    // recorded calls
    pub selections: Vec<String>,
    pub opened_folders: Vec<String>,
    pub history_calls: Vec<&'static str>,
    pub panel_documents: Vec<String>,
    pub confirm_prompts: Vec<String>,
}

pub struct MockHost {
    pub state: Mutex<MockHostState>,
}

impl MockHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(MockHostState {
                show_completed_todos: true,
                panel_visible: true,
                confirm_answer: true,
                ..MockHostState::default()
            }),
        })
    }

    pub fn add_note(&self, id: &str, title: &str) {
        self.state.lock().notes.insert(
            id.to_string(),
            NoteDetails {
                id: id.to_string(),
                title: title.to_string(),
                is_todo: false,
                todo_completed: 0,
                parent_id: None,
            },
        );
    }

    pub fn add_todo(&self, id: &str, title: &str, completed: i64) {
        self.state.lock().notes.insert(
            id.to_string(),
            NoteDetails {
                id: id.to_string(),
                title: title.to_string(),
                is_todo: true,
                todo_completed: completed,
                parent_id: None,
            },
        );
    }

    pub fn add_folder(&self, id: &str, title: &str, parent_id: Option<&str>) {
        self.state.lock().folders.insert(
            id.to_string(),
            Folder {
                id: id.to_string(),
                title: title.to_string(),
                parent_id: parent_id.map(str::to_string),
            },
        );
    }

    pub fn set_note_parent(&self, note_id: &str, folder_id: &str) {
        if let Some(note) = self.state.lock().notes.get_mut(note_id) {
            note.parent_id = Some(folder_id.to_string());
        }
    }

    pub fn remove_note(&self, id: &str) {
        self.state.lock().notes.remove(id);
    }

    /// Make `id` the selected note (single selection).
    pub fn select(&self, id: &str) {
        let mut state = self.state.lock();
        state.selected = Some(id.to_string());
        state.selected_ids = vec![id.to_string()];
    }

    /// Selection requests issued by the plugin, in order.
    pub fn selection_requests(&self) -> Vec<String> {
        self.state.lock().selections.clone()
    }

    /// The most recently pushed panel document.
    pub fn last_document(&self) -> String {
        self.state
            .lock()
            .panel_documents
            .last()
            .cloned()
            .unwrap_or_default()
    }

    pub fn document_count(&self) -> usize {
        self.state.lock().panel_documents.len()
    }

    pub fn note_completed(&self, id: &str) -> i64 {
        self.state.lock().notes[id].todo_completed
    }
}

#[async_trait]
impl Host for MockHost {
    async fn note(&self, id: &str) -> Result<NoteDetails, HostError> {
        let state = self.state.lock();
        if state.fail_note_fetch {
            return Err(HostError::Failed("host unavailable".to_string()));
        }
        state.notes.get(id).cloned().ok_or(HostError::NotFound)
    }

    async fn set_todo_completed(&self, id: &str, completed: i64) -> Result<(), HostError> {
        let mut state = self.state.lock();
        let note = state.notes.get_mut(id).ok_or(HostError::NotFound)?;
        note.todo_completed = completed;
        Ok(())
    }

    async fn folder(&self, id: &str) -> Result<Folder, HostError> {
        self.state
            .lock()
            .folders
            .get(id)
            .cloned()
            .ok_or(HostError::NotFound)
    }

    async fn selected_note(&self) -> Result<Option<NoteDetails>, HostError> {
        let state = self.state.lock();
        Ok(state
            .selected
            .as_ref()
            .and_then(|id| state.notes.get(id))
            .cloned())
    }

    async fn selected_note_ids(&self) -> Result<Vec<String>, HostError> {
        Ok(self.state.lock().selected_ids.clone())
    }

    async fn select_note(&self, id: &str) -> Result<(), HostError> {
        let mut state = self.state.lock();
        state.selections.push(id.to_string());
        state.selected = Some(id.to_string());
        state.selected_ids = vec![id.to_string()];
        Ok(())
    }

    async fn open_folder(&self, id: &str) -> Result<(), HostError> {
        self.state.lock().opened_folders.push(id.to_string());
        Ok(())
    }

    async fn history_back(&self) -> Result<(), HostError> {
        self.state.lock().history_calls.push("back");
        Ok(())
    }

    async fn history_forward(&self) -> Result<(), HostError> {
        self.state.lock().history_calls.push("forward");
        Ok(())
    }

    async fn show_completed_todos(&self) -> Result<bool, HostError> {
        Ok(self.state.lock().show_completed_todos)
    }

    async fn set_panel_html(&self, html: &str) -> Result<(), HostError> {
        self.state.lock().panel_documents.push(html.to_string());
        Ok(())
    }

    async fn panel_visible(&self) -> Result<bool, HostError> {
        Ok(self.state.lock().panel_visible)
    }

    async fn show_panel(&self, visible: bool) -> Result<(), HostError> {
        self.state.lock().panel_visible = visible;
        Ok(())
    }

    async fn confirm(&self, message: &str) -> Result<bool, HostError> {
        let mut state = self.state.lock();
        state.confirm_prompts.push(message.to_string());
        Ok(state.confirm_answer)
    }
}
