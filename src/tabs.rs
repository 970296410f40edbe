//! Ordered tab collection with write-through persistence.
//!
//! [`NoteTabs`] owns the in-memory tab list and is the only code allowed to
//! mutate it. Every mutating operation immediately persists the full list
//! through the injected [`TabStore`], so the collection and its stored
//! representation are coherent after every call; there is no dirty/flush
//! window visible to callers.

use std::sync::Arc;

use anyhow::Result;
use parking_lot::Mutex;

use note_tabs_config::{NoteTab, SettingsStore, TabKind};

/// Persistence sink for the tab list.
pub trait TabStore: Send {
    /// Persist the full list in display order.
    fn persist(&mut self, tabs: &[NoteTab]) -> Result<()>;
}

/// Production store: writes the list into the settings store's `noteTabs`
/// value, which saves to disk on each write.
pub struct SettingsTabStore {
    store: Arc<Mutex<SettingsStore>>,
}

impl SettingsTabStore {
    pub fn new(store: Arc<Mutex<SettingsStore>>) -> Self {
        Self { store }
    }
}

impl TabStore for SettingsTabStore {
    fn persist(&mut self, tabs: &[NoteTab]) -> Result<()> {
        self.store.lock().store_note_tabs(tabs)?;
        Ok(())
    }
}

/// In-memory store for tests and headless embedding. The shared handle
/// returned by [`MemoryTabStore::new`] observes every persisted snapshot.
pub struct MemoryTabStore {
    saved: Arc<Mutex<Vec<NoteTab>>>,
}

impl MemoryTabStore {
    pub fn new() -> (Self, Arc<Mutex<Vec<NoteTab>>>) {
        let saved = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                saved: Arc::clone(&saved),
            },
            saved,
        )
    }
}

impl TabStore for MemoryTabStore {
    fn persist(&mut self, tabs: &[NoteTab]) -> Result<()> {
        *self.saved.lock() = tabs.to_vec();
        Ok(())
    }
}

/// Ordered, duplicate-free list of note tabs.
pub struct NoteTabs {
    tabs: Vec<NoteTab>,
    store: Box<dyn TabStore>,
}

impl NoteTabs {
    /// Build the collection from a previously persisted list.
    pub fn new(tabs: Vec<NoteTab>, store: Box<dyn TabStore>) -> Self {
        Self { tabs, store }
    }

    /// All tabs in display order.
    pub fn all(&self) -> &[NoteTab] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Tab at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&NoteTab> {
        self.tabs.get(index)
    }

    /// Position of the tab for the given note.
    pub fn index_of(&self, note_id: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == note_id)
    }

    /// Position of the unique temporary tab, if one exists.
    pub fn index_of_temporary(&self) -> Option<usize> {
        self.tabs.iter().position(|t| t.kind == TabKind::Temporary)
    }

    /// Whether the given note already has a tab.
    pub fn has_tab(&self, note_id: &str) -> bool {
        self.index_of(note_id).is_some()
    }

    /// Append a tab at the end, or insert it immediately before the tab of
    /// `before_id` when that tab exists.
    ///
    /// Does NOT check for duplicate ids: callers must guard with
    /// [`has_tab`](Self::has_tab) first. An empty id is a silent no-op.
    pub fn add(&mut self, note_id: &str, kind: TabKind, before_id: Option<&str>) -> Result<()> {
        if note_id.is_empty() {
            return Ok(());
        }

        let tab = NoteTab::new(note_id, kind);
        match before_id.and_then(|target| self.index_of(target)) {
            Some(index) => self.tabs.insert(index, tab),
            None => self.tabs.push(tab),
        }
        self.persist()
    }

    /// Move the tab at `source_idx` to `target_idx`, computed against the
    /// post-removal list (a standard list move, not a swap). Out-of-range
    /// indices are a no-op.
    pub fn move_with_index(&mut self, source_idx: usize, target_idx: usize) -> Result<()> {
        if source_idx >= self.len() || target_idx >= self.len() {
            return Ok(());
        }
        if source_idx == target_idx {
            return Ok(());
        }

        let tab = self.tabs.remove(source_idx);
        self.tabs.insert(target_idx, tab);
        self.persist()
    }

    /// Move the tab of `source_id` to the position of `target_id`, or to the
    /// last position when no target is given.
    pub fn move_with_id(&mut self, source_id: &str, target_id: Option<&str>) -> Result<()> {
        let Some(source_idx) = self.index_of(source_id) else {
            return Ok(());
        };
        let target_idx = match target_id {
            Some(target) => match self.index_of(target) {
                Some(idx) => idx,
                None => return Ok(()),
            },
            None => self.len().saturating_sub(1),
        };
        self.move_with_index(source_idx, target_idx)
    }

    /// Change the kind of an existing tab in place; absent tabs are a no-op.
    pub fn change_kind(&mut self, note_id: &str, kind: TabKind) -> Result<()> {
        let Some(index) = self.index_of(note_id) else {
            return Ok(());
        };
        self.tabs[index].kind = kind;
        self.persist()
    }

    /// Point the temporary tab at a different note, keeping its position and
    /// kind. No-op when no temporary tab exists or the id is empty.
    pub fn replace_temporary(&mut self, note_id: &str) -> Result<()> {
        if note_id.is_empty() {
            return Ok(());
        }
        let Some(index) = self.index_of_temporary() else {
            return Ok(());
        };
        self.tabs[index].id = note_id.to_string();
        self.persist()
    }

    /// Remove the tab of the given note; absent tabs are a no-op.
    pub fn delete(&mut self, note_id: &str) -> Result<()> {
        let Some(index) = self.index_of(note_id) else {
            return Ok(());
        };
        self.tabs.remove(index);
        self.persist()
    }

    /// Remove all tabs.
    pub fn clear_all(&mut self) -> Result<()> {
        self.tabs.clear();
        self.persist()
    }

    fn persist(&mut self) -> Result<()> {
        self.store.persist(&self.tabs)
    }
}
