//! Persisted settings store.
//!
//! Holds every registered setting (and the private tab list) as a key/value
//! map backed by a YAML file. Writes are atomic (temp file + rename) so a
//! crash mid-save never leaves a corrupt file behind. External edits are
//! picked up via [`reload`](SettingsStore::reload), which reports the set of
//! changed keys so the typed [`Settings`](crate::Settings) mirror can refresh
//! only what actually changed.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::ConfigError;
use crate::specs::{NOTE_TABS_KEY, SettingSpec};
use crate::types::NoteTab;

/// Notification that a set of settings changed.
///
/// Carried by the settings-change event; `keys` names exactly the options
/// whose stored values differ from the previously loaded ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeEvent {
    pub keys: Vec<String>,
}

impl ChangeEvent {
    /// Whether the change touches the given setting key.
    pub fn affects(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }
}

/// Key/value settings store persisted as a YAML file.
pub struct SettingsStore {
    path: PathBuf,
    values: BTreeMap<String, Value>,
}

impl SettingsStore {
    /// Open the store at `path`, loading existing values if the file exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let values = if path.exists() {
            log::info!("Loading settings from {}", path.display());
            Self::read_file(&path)?
        } else {
            log::info!(
                "Settings file not found, starting empty at {}",
                path.display()
            );
            BTreeMap::new()
        };
        Ok(Self { path, values })
    }

    /// Open the store at the default platform path.
    pub fn open_default() -> Result<Self, ConfigError> {
        Self::open(Self::default_path())
    }

    /// Default settings file path.
    pub fn default_path() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join("note-tabs").join("settings.yaml")
            } else {
                PathBuf::from("settings.yaml")
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            // XDG convention on all other platforms: ~/.config/note-tabs/settings.yaml
            if let Some(home_dir) = dirs::home_dir() {
                home_dir
                    .join(".config")
                    .join("note-tabs")
                    .join("settings.yaml")
            } else {
                PathBuf::from("settings.yaml")
            }
        }
    }

    fn read_file(path: &Path) -> Result<BTreeMap<String, Value>, ConfigError> {
        let contents = fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_yaml_ng::from_str(&contents)?)
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Save the store to its backing file.
    ///
    /// Atomic: writes to a temp file next to the target, then renames.
    pub fn save(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml_ng::to_string(&self.values)?;

        let temp_path = self.path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml)?;
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }

    /// Seed missing keys with their registered defaults and persist if
    /// anything was added. Present values are never overwritten.
    pub fn seed_defaults(&mut self, specs: &[SettingSpec]) -> Result<(), ConfigError> {
        let mut seeded = false;
        for spec in specs {
            if !self.values.contains_key(spec.key) {
                self.values
                    .insert(spec.key.to_string(), spec.default.clone());
                seeded = true;
            }
        }
        if seeded {
            self.save()?;
        }
        Ok(())
    }

    /// Raw value of a setting, if present.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Set a value and write through to disk.
    pub fn set_value(&mut self, key: &str, value: Value) -> Result<(), ConfigError> {
        self.values.insert(key.to_string(), value);
        self.save()
    }

    /// Re-read the backing file and report which keys changed.
    ///
    /// Added, removed and modified keys all count as changed.
    pub fn reload(&mut self) -> Result<ChangeEvent, ConfigError> {
        let fresh = if self.path.exists() {
            Self::read_file(&self.path)?
        } else {
            BTreeMap::new()
        };

        let mut keys: Vec<String> = Vec::new();
        for (key, value) in &fresh {
            if self.values.get(key) != Some(value) {
                keys.push(key.clone());
            }
        }
        for key in self.values.keys() {
            if !fresh.contains_key(key) {
                keys.push(key.clone());
            }
        }

        self.values = fresh;
        if !keys.is_empty() {
            log::debug!("Settings reloaded, changed keys: {keys:?}");
        }
        Ok(ChangeEvent { keys })
    }

    /// The persisted tab list, in display order.
    ///
    /// A missing or malformed value yields an empty list; the tab bar must
    /// stay operable even if the stored state was damaged.
    pub fn note_tabs(&self) -> Vec<NoteTab> {
        match self.values.get(NOTE_TABS_KEY) {
            None => Vec::new(),
            Some(value) => match serde_json::from_value(value.clone()) {
                Ok(tabs) => tabs,
                Err(e) => {
                    log::warn!("Discarding malformed {NOTE_TABS_KEY} value: {e}");
                    Vec::new()
                }
            },
        }
    }

    /// Write the tab list through to disk.
    pub fn store_note_tabs(&mut self, tabs: &[NoteTab]) -> Result<(), ConfigError> {
        let value = serde_json::to_value(tabs)
            .map_err(|e| ConfigError::Validation(format!("{NOTE_TABS_KEY}: {e}")))?;
        self.set_value(NOTE_TABS_KEY, value)
    }

    /// Empty the tab list and persist.
    pub fn clear_note_tabs(&mut self) -> Result<(), ConfigError> {
        self.store_note_tabs(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specs::all_specs;
    use crate::types::TabKind;
    use serde_json::json;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> SettingsStore {
        SettingsStore::open(dir.path().join("settings.yaml")).unwrap()
    }

    #[test]
    fn missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.value("tabHeight").is_none());
    }

    #[test]
    fn set_value_round_trips_through_file() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.set_value("tabHeight", json!(42)).unwrap();

        let reopened = store_in(&dir);
        assert_eq!(reopened.value("tabHeight"), Some(&json!(42)));
    }

    #[test]
    fn save_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.set_value("fontFamily", json!("Roboto")).unwrap();
        assert!(dir.path().join("settings.yaml").exists());
        assert!(!dir.path().join("settings.yaml.tmp").exists());
    }

    #[test]
    fn seed_defaults_fills_missing_keys_only() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.set_value("tabHeight", json!(99)).unwrap();
        store.seed_defaults(&all_specs()).unwrap();

        // Pre-existing value untouched, missing ones seeded
        assert_eq!(store.value("tabHeight"), Some(&json!(99)));
        assert_eq!(store.value("minTabWidth"), Some(&json!(50)));
        assert_eq!(store.value("fontFamily"), Some(&json!("default")));
        assert_eq!(store.value(NOTE_TABS_KEY), Some(&json!([])));
    }

    #[test]
    fn reload_reports_changed_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.yaml");
        let mut store = SettingsStore::open(&path).unwrap();
        store.set_value("tabHeight", json!(35)).unwrap();
        store.set_value("minTabWidth", json!(50)).unwrap();

        // External edit: change one key, add another
        std::fs::write(&path, "tabHeight: 40\nminTabWidth: 50\nmaxTabWidth: 120\n").unwrap();

        let event = store.reload().unwrap();
        let mut keys = event.keys.clone();
        keys.sort();
        assert_eq!(keys, vec!["maxTabWidth", "tabHeight"]);
        assert!(event.affects("tabHeight"));
        assert!(!event.affects("minTabWidth"));
        assert_eq!(store.value("tabHeight"), Some(&json!(40)));
    }

    #[test]
    fn note_tabs_round_trip_preserves_order() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let tabs = vec![
            NoteTab::new("b", TabKind::Pinned),
            NoteTab::new("a", TabKind::Temporary),
            NoteTab::new("c", TabKind::Pinned),
        ];
        store.store_note_tabs(&tabs).unwrap();

        let reopened = store_in(&dir);
        assert_eq!(reopened.note_tabs(), tabs);
    }

    #[test]
    fn malformed_note_tabs_value_is_discarded() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.set_value(NOTE_TABS_KEY, json!("not an array")).unwrap();
        assert!(store.note_tabs().is_empty());
    }

    #[test]
    fn clear_note_tabs_persists_empty_list() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store
            .store_note_tabs(&[NoteTab::new("a", TabKind::Pinned)])
            .unwrap();
        store.clear_note_tabs().unwrap();

        let reopened = store_in(&dir);
        assert!(reopened.note_tabs().is_empty());
    }
}
