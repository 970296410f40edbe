//! Plugin context and event orchestration.
//!
//! [`Plugin`] owns the long-lived state (tab collection, settings mirror,
//! last-active queue, panel) and is driven exclusively by [`PluginEvent`]s
//! arriving on a single-consumer queue. Handlers run to completion before the
//! next event is taken, so no two mutations of the tab state ever interleave.
//! A failing handler is logged and aborts only its own invocation.

use std::sync::Arc;

use anyhow::Result;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use note_tabs_config::{AddBehavior, ChangeEvent, Settings, SettingsStore, TabKind};

use crate::commands::Command;
use crate::host::{Host, HostError, NoteChangeKind, NoteDetails};
use crate::last_active::LastActiveQueue;
use crate::panel::{Panel, PanelMessage};
use crate::replacement;
use crate::tabs::{NoteTabs, SettingsTabStore};

/// Host lifecycle events and user actions, dispatched to the handler loop.
#[derive(Debug)]
pub enum PluginEvent {
    /// The selected note changed.
    NoteSelectionChange,
    /// A note was created, updated or deleted.
    NoteChange { id: String, kind: NoteChangeKind },
    /// A sync cycle finished; referenced notes may have appeared or gone.
    SyncComplete,
    /// Settings changed; carries the affected keys.
    SettingsChange(ChangeEvent),
    /// Raw JSON message posted by the panel webview.
    PanelMessage(serde_json::Value),
    /// A registered command was invoked.
    Command(Command),
}

/// The plugin instance: all long-lived state, threaded through every handler.
pub struct Plugin {
    host: Arc<dyn Host>,
    store: Arc<Mutex<SettingsStore>>,
    settings: Settings,
    tabs: NoteTabs,
    last_active: LastActiveQueue,
    panel: Panel,
}

impl Plugin {
    /// Build the plugin: registers settings (seeding defaults, initial full
    /// read) and restores the persisted tab list.
    pub fn new(host: Arc<dyn Host>, mut store: SettingsStore) -> Result<Self> {
        let mut settings = Settings::new();
        settings.register(&mut store)?;

        let initial_tabs = store.note_tabs();
        log::info!("Restored {} tab(s) from settings", initial_tabs.len());

        let store = Arc::new(Mutex::new(store));
        let tabs = NoteTabs::new(
            initial_tabs,
            Box::new(SettingsTabStore::new(Arc::clone(&store))),
        );
        let panel = Panel::new(Arc::clone(&host));

        Ok(Self {
            host,
            store,
            settings,
            tabs,
            last_active: LastActiveQueue::new(),
            panel,
        })
    }

    /// Register the panel and push the first real render.
    pub async fn start(&mut self) -> Result<()> {
        self.panel.register(&self.settings).await?;
        self.update_panel().await
    }

    /// Current tab list (test and embedder introspection).
    pub fn tabs(&self) -> &NoteTabs {
        &self.tabs
    }

    /// Current settings mirror.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Shared handle to the settings store backing this plugin.
    pub fn settings_store(&self) -> Arc<Mutex<SettingsStore>> {
        Arc::clone(&self.store)
    }

    /// Consume events until the queue closes. Handler failures are logged
    /// and abort only that invocation; the loop keeps running.
    pub async fn run(&mut self, mut events: mpsc::UnboundedReceiver<PluginEvent>) {
        while let Some(event) = events.recv().await {
            if let Err(e) = self.handle_event(event).await {
                log::error!("Event handler failed: {e:#}");
            }
        }
        log::info!("Event queue closed, plugin loop exiting");
    }

    /// Dispatch a single event.
    pub async fn handle_event(&mut self, event: PluginEvent) -> Result<()> {
        match event {
            PluginEvent::NoteSelectionChange => self.on_note_selection_change().await,
            PluginEvent::NoteChange { id, kind } => self.on_note_change(&id, kind).await,
            PluginEvent::SyncComplete => self.update_panel().await,
            PluginEvent::SettingsChange(change) => {
                {
                    let store = self.store.lock();
                    self.settings.read(&store, Some(&change));
                }
                self.update_panel().await
            }
            PluginEvent::PanelMessage(value) => match PanelMessage::parse(value) {
                Some(message) => self.handle_panel_message(message).await,
                None => Ok(()),
            },
            PluginEvent::Command(command) => self.handle_command(command).await,
        }
    }

    /// Ensure the newly selected note has a tab and record it as current.
    async fn on_note_selection_change(&mut self) -> Result<()> {
        if let Some(selected) = self.host.selected_note().await? {
            self.add_tab(&selected.id)?;
            self.last_active.push(selected.id);
        }
        self.update_panel().await
    }

    async fn on_note_change(&mut self, id: &str, kind: NoteChangeKind) -> Result<()> {
        match kind {
            NoteChangeKind::Deleted => {
                self.tabs.delete(id)?;
            }
            NoteChangeKind::Updated => match self.host.note(id).await {
                Ok(note) => {
                    if self.settings.pin_edited_notes {
                        // Auto-pin must not create tabs for untracked notes
                        self.pin_tab(&note, false, None)?;
                    }
                    if self.settings.unpin_completed_todos && note.is_completed_todo() {
                        self.remove_tab(&note.id).await?;
                    }
                }
                Err(HostError::NotFound) => {
                    self.tabs.delete(id)?;
                }
                Err(e) => return Err(e.into()),
            },
            NoteChangeKind::Created => {
                log::debug!("Note {id} created");
            }
        }
        self.update_panel().await
    }

    async fn handle_panel_message(&mut self, message: PanelMessage) -> Result<()> {
        match message {
            // Re-render follows from the resulting selection-change event
            PanelMessage::Open { id } => self.host.select_note(&id).await?,
            PanelMessage::OpenFolder { id } => self.host.open_folder(&id).await?,
            PanelMessage::PinNote { id } => {
                return self
                    .handle_command(Command::PinNote {
                        ids: vec![id],
                        target: None,
                    })
                    .await;
            }
            PanelMessage::UnpinNote { id } => {
                return self
                    .handle_command(Command::UnpinNote { ids: vec![id] })
                    .await;
            }
            // Re-render follows from the note-change event
            PanelMessage::ToggleTodo { id, checked } => self.panel.toggle_todo(&id, checked).await,
            PanelMessage::MoveLeft => return self.handle_command(Command::MoveTabLeft).await,
            PanelMessage::MoveRight => return self.handle_command(Command::MoveTabRight).await,
            PanelMessage::Back => self.host.history_back().await?,
            PanelMessage::Forward => self.host.history_forward().await?,
            PanelMessage::Drag {
                source_id,
                target_id,
            } => {
                self.tabs.move_with_id(&source_id, Some(&target_id))?;
                return self.update_panel().await;
            }
            PanelMessage::DragNotes {
                note_ids,
                target_id,
            } => {
                return self
                    .handle_command(Command::PinNote {
                        ids: note_ids,
                        target: Some(target_id),
                    })
                    .await;
            }
        }
        Ok(())
    }

    async fn handle_command(&mut self, command: Command) -> Result<()> {
        match command {
            Command::PinNote { ids, target } => {
                for id in self.resolve_ids(ids).await? {
                    match self.host.note(&id).await {
                        Ok(note) => self.pin_tab(&note, true, target.as_deref())?,
                        Err(HostError::NotFound) => {
                            self.tabs.delete(&id)?;
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
                self.update_panel().await
            }
            Command::UnpinNote { ids } => {
                for id in self.resolve_ids(ids).await? {
                    self.remove_tab(&id).await?;
                }
                self.update_panel().await
            }
            Command::MoveTabLeft => {
                if let Some(index) = self.selected_tab_index().await?
                    && let Some(target) = index.checked_sub(1)
                {
                    self.tabs.move_with_index(index, target)?;
                }
                self.update_panel().await
            }
            Command::MoveTabRight => {
                if let Some(index) = self.selected_tab_index().await? {
                    // Out-of-range target is a collection-level no-op
                    self.tabs.move_with_index(index, index + 1)?;
                }
                self.update_panel().await
            }
            Command::SwitchTabLeft => self.switch_tab(-1).await,
            Command::SwitchTabRight => self.switch_tab(1).await,
            Command::SwitchLastActiveTab => {
                if let Some(id) = self.last_active.pop() {
                    self.host.select_note(&id).await?;
                }
                Ok(())
            }
            Command::ClearTabs => {
                if self
                    .host
                    .confirm("Do you really want to remove all tabs?")
                    .await?
                {
                    self.tabs.clear_all()?;
                    self.update_panel().await?;
                }
                Ok(())
            }
            Command::ToggleVisibility => self.panel.toggle_visibility().await,
        }
    }

    /// Create a tab for a note that has none, honoring the add behavior.
    fn add_tab(&mut self, note_id: &str) -> Result<()> {
        if note_id.is_empty() || self.tabs.has_tab(note_id) {
            return Ok(());
        }
        match self.settings.add_behavior {
            AddBehavior::Pinned => self.tabs.add(note_id, TabKind::Pinned, None),
            AddBehavior::Temporary => {
                if self.tabs.index_of_temporary().is_some() {
                    self.tabs.replace_temporary(note_id)
                } else {
                    self.tabs.add(note_id, TabKind::Temporary, None)
                }
            }
        }
    }

    /// Pin a note's tab, upgrading an existing tab in place. New tabs are
    /// only created when `add_if_absent` is set (explicit pin command, not
    /// auto-pin-on-edit). Completed to-dos are refused while auto-unpin is
    /// active, otherwise they would bounce right out again.
    fn pin_tab(
        &mut self,
        note: &NoteDetails,
        add_if_absent: bool,
        target: Option<&str>,
    ) -> Result<()> {
        if self.settings.unpin_completed_todos && note.is_completed_todo() {
            log::debug!("Not pinning completed to-do {}", note.id);
            return Ok(());
        }
        if self.tabs.has_tab(&note.id) {
            self.tabs.change_kind(&note.id, TabKind::Pinned)
        } else if add_if_absent {
            self.tabs.add(&note.id, TabKind::Pinned, target)
        } else {
            Ok(())
        }
    }

    /// Remove a note's tab. For the selected note a replacement selection is
    /// picked through the configured strategy chain; when nothing qualifies
    /// the tab is resurrected so the selected note never ends up untracked.
    async fn remove_tab(&mut self, note_id: &str) -> Result<()> {
        let selected_id = self.host.selected_note().await?.map(|n| n.id);
        if selected_id.as_deref() != Some(note_id) {
            return self.tabs.delete(note_id);
        }

        let Some(removed_idx) = self.tabs.index_of(note_id) else {
            return Ok(());
        };
        let replacement = replacement::pick_replacement(
            self.settings.unpin_behavior,
            &self.tabs,
            removed_idx,
            note_id,
            &mut self.last_active,
        );
        self.tabs.delete(note_id)?;

        match replacement {
            Some(id) => self.host.select_note(&id).await?,
            None => self.add_tab(note_id)?,
        }
        Ok(())
    }

    /// Select the neighbor tab in the given direction; boundary positions
    /// are a no-op. The re-render is driven by the selection-change event.
    async fn switch_tab(&mut self, direction: i64) -> Result<()> {
        let Some(index) = self.selected_tab_index().await? else {
            return Ok(());
        };
        let neighbor = if direction < 0 {
            index.checked_sub(1)
        } else {
            Some(index + 1)
        };
        if let Some(tab) = neighbor.and_then(|idx| self.tabs.get(idx)) {
            let id = tab.id.clone();
            self.host.select_note(&id).await?;
        }
        Ok(())
    }

    async fn selected_tab_index(&self) -> Result<Option<usize>> {
        let selected = self.host.selected_note().await?;
        Ok(selected.and_then(|note| self.tabs.index_of(&note.id)))
    }

    /// Empty id lists (command invoked without arguments) fall back to the
    /// host's current multi-selection.
    async fn resolve_ids(&self, ids: Vec<String>) -> Result<Vec<String>> {
        if ids.is_empty() {
            Ok(self.host.selected_note_ids().await?)
        } else {
            Ok(ids)
        }
    }

    async fn update_panel(&mut self) -> Result<()> {
        self.panel.update(&mut self.tabs, &self.settings).await
    }
}
