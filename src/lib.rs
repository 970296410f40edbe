//! Note tab bar panel for a note-taking application plugin host.
//!
//! Tracks which notes are open as tabs (temporary or pinned), renders them
//! as an HTML document for the host's webview panel, and keeps tab state in
//! sync with note-selection, note-editing, sync and settings-change events.
//!
//! The host application is consumed only through the [`host::Host`] trait.
//! Embedders translate host callbacks into [`app::PluginEvent`] values and
//! feed them to [`app::Plugin::run`]; the single-consumer queue preserves
//! the run-to-completion ordering the tab state relies on. Settings changes
//! are detected by pairing a [`note_tabs_config::SettingsWatcher`] with
//! [`note_tabs_config::SettingsStore::reload`] and forwarding the resulting
//! change event.

pub mod app;
pub mod commands;
pub mod host;
pub mod last_active;
pub mod panel;
pub mod replacement;
pub mod tabs;

// Re-export main types for convenience
pub use app::{Plugin, PluginEvent};
pub use commands::{Command, CommandSpec, command_specs};
pub use host::{Folder, Host, HostError, NoteChangeKind, NoteDetails};
pub use last_active::LastActiveQueue;
pub use panel::{Panel, PanelMessage};
pub use tabs::{MemoryTabStore, NoteTabs, SettingsTabStore, TabStore};

pub use note_tabs_config::{
    AddBehavior, ChangeEvent, LayoutMode, NoteTab, Settings, SettingsStore, TabKind, UnpinBehavior,
};
