//! Settings model for the note-tabs panel.
//!
//! This crate provides everything around configuration and persisted state:
//!
//! - Tab record and policy enum types
//! - Setting registration descriptors with defaults
//! - The key/value settings store with atomic file persistence
//! - The typed [`Settings`] mirror with partial refresh on change events
//! - Settings file watching for change notifications

pub mod error;
pub mod settings;
pub mod specs;
pub mod store;
mod types;
#[cfg(feature = "watcher")]
pub mod watcher;

// Re-export main types for convenience
pub use error::ConfigError;
pub use settings::{Settings, theme};
pub use specs::{NOTE_TABS_KEY, SECTION, SettingKind, SettingSpec, all_specs};
pub use store::{ChangeEvent, SettingsStore};
pub use types::{AddBehavior, LayoutMode, NoteTab, TabKind, UnpinBehavior};
#[cfg(feature = "watcher")]
pub use watcher::{ReloadSignal, SettingsWatcher};
