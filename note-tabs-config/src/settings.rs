//! Typed settings mirror.
//!
//! [`Settings`] holds the decoded value of every user-facing option. It is
//! registered once at startup (seeding defaults into the store, then doing a
//! full read) and afterwards refreshed through [`Settings::read`], which on a
//! change event re-reads only the affected keys and leaves every other field
//! untouched.
//!
//! String-valued style options support the `"default"` sentinel, meaning
//! "defer to the host theme": the sentinel is replaced by a hard-coded theme
//! variable at read time, so consumers never see the raw sentinel.

use regex::Regex;
use serde_json::Value;

use crate::specs::all_specs;
use crate::store::{ChangeEvent, SettingsStore};
use crate::types::{AddBehavior, LayoutMode, UnpinBehavior};

/// Host theme fallbacks applied when a style option is set to `"default"`.
pub mod theme {
    pub const FONT_FAMILY: &str = "Roboto";
    pub const FONT_SIZE: &str = "var(--note-font-size)";
    pub const BACKGROUND: &str = "var(--note-background-color3)";
    pub const HOVER_BACKGROUND: &str = "var(--note-background-color-hover3)";
    pub const ACTIVE_BACKGROUND: &str = "var(--note-background-color)";
    pub const FOREGROUND: &str = "var(--note-color-faded)";
    pub const ACTIVE_FOREGROUND: &str = "var(--note-color)";
    pub const DIVIDER_COLOR: &str = "var(--note-divider-color)";
}

/// Decoded plugin settings.
#[derive(Debug, Clone)]
pub struct Settings {
    // general settings
    pub enable_drag_and_drop: bool,
    pub show_todo_checkboxes: bool,
    pub show_breadcrumbs: bool,
    pub show_navigation_buttons: bool,
    pub pin_edited_notes: bool,
    pub unpin_completed_todos: bool,
    pub add_behavior: AddBehavior,
    pub unpin_behavior: UnpinBehavior,
    pub layout_mode: LayoutMode,
    // advanced settings
    pub tab_height: u32,
    pub min_tab_width: u32,
    pub max_tab_width: u32,
    pub breadcrumbs_min_width: u32,
    pub breadcrumbs_max_width: u32,
    pub font_family: String,
    pub font_size: String,
    pub background: String,
    pub hover_background: String,
    pub active_background: String,
    pub breadcrumbs_background: String,
    pub foreground: String,
    pub active_foreground: String,
    pub divider_color: String,
    // internals
    default_re: Regex,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enable_drag_and_drop: true,
            show_todo_checkboxes: false,
            show_breadcrumbs: false,
            show_navigation_buttons: false,
            pin_edited_notes: false,
            unpin_completed_todos: false,
            add_behavior: AddBehavior::default(),
            unpin_behavior: UnpinBehavior::default(),
            layout_mode: LayoutMode::default(),
            tab_height: 35,
            min_tab_width: 50,
            max_tab_width: 150,
            breadcrumbs_min_width: 10,
            breadcrumbs_max_width: 100,
            font_family: "default".to_string(),
            font_size: "default".to_string(),
            background: "default".to_string(),
            hover_background: "default".to_string(),
            active_background: "default".to_string(),
            breadcrumbs_background: "default".to_string(),
            foreground: "default".to_string(),
            active_foreground: "default".to_string(),
            divider_color: "default".to_string(),
            // Matches the sentinel anywhere, case-insensitively
            default_re: Regex::new("(?i)default").expect("static regex"),
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register all settings: seed missing defaults into the store, then
    /// perform the initial full read.
    pub fn register(&mut self, store: &mut SettingsStore) -> Result<(), crate::ConfigError> {
        store.seed_defaults(&all_specs())?;
        self.read(store, None);
        Ok(())
    }

    /// Update settings from the store. With no event every option is
    /// re-read; with a change event only the named keys are touched and all
    /// other fields keep their previous in-memory values.
    pub fn read(&mut self, store: &SettingsStore, event: Option<&ChangeEvent>) {
        self.enable_drag_and_drop =
            read_bool(store, event, "enableDragAndDrop", self.enable_drag_and_drop);
        self.show_todo_checkboxes =
            read_bool(store, event, "showTodoCheckboxes", self.show_todo_checkboxes);
        self.show_breadcrumbs = read_bool(store, event, "showBreadcrumbs", self.show_breadcrumbs);
        self.show_navigation_buttons = read_bool(
            store,
            event,
            "showNavigationButtons",
            self.show_navigation_buttons,
        );
        self.pin_edited_notes = read_bool(store, event, "pinEditedNotes", self.pin_edited_notes);
        self.unpin_completed_todos = read_bool(
            store,
            event,
            "unpinCompletedTodos",
            self.unpin_completed_todos,
        );
        self.add_behavior = read_enum(store, event, "addBehavior", self.add_behavior);
        self.unpin_behavior = read_enum(store, event, "unpinBehavior", self.unpin_behavior);
        self.layout_mode = read_enum(store, event, "layoutMode", self.layout_mode);
        self.tab_height = read_int(store, event, "tabHeight", self.tab_height);
        self.min_tab_width = read_int(store, event, "minTabWidth", self.min_tab_width);
        self.max_tab_width = read_int(store, event, "maxTabWidth", self.max_tab_width);
        self.breadcrumbs_min_width = read_int(
            store,
            event,
            "breadcrumbsMinWidth",
            self.breadcrumbs_min_width,
        );
        self.breadcrumbs_max_width = read_int(
            store,
            event,
            "breadcrumbsMaxWidth",
            self.breadcrumbs_max_width,
        );
        self.font_family =
            self.read_style(store, event, "fontFamily", &self.font_family, theme::FONT_FAMILY);
        self.font_size =
            self.read_style(store, event, "fontSize", &self.font_size, theme::FONT_SIZE);
        self.background = self.read_style(
            store,
            event,
            "mainBackground",
            &self.background,
            theme::BACKGROUND,
        );
        self.hover_background = self.read_style(
            store,
            event,
            "hoverBackground",
            &self.hover_background,
            theme::HOVER_BACKGROUND,
        );
        self.active_background = self.read_style(
            store,
            event,
            "activeBackground",
            &self.active_background,
            theme::ACTIVE_BACKGROUND,
        );
        self.breadcrumbs_background = self.read_style(
            store,
            event,
            "breadcrumbsBackground",
            &self.breadcrumbs_background,
            theme::ACTIVE_BACKGROUND,
        );
        self.foreground = self.read_style(
            store,
            event,
            "mainForeground",
            &self.foreground,
            theme::FOREGROUND,
        );
        self.active_foreground = self.read_style(
            store,
            event,
            "activeForeground",
            &self.active_foreground,
            theme::ACTIVE_FOREGROUND,
        );
        self.divider_color = self.read_style(
            store,
            event,
            "dividerColor",
            &self.divider_color,
            theme::DIVIDER_COLOR,
        );
    }

    /// Read a style string, resolving the `"default"` sentinel to its theme
    /// fallback.
    fn read_style(
        &self,
        store: &SettingsStore,
        event: Option<&ChangeEvent>,
        key: &str,
        current: &str,
        fallback: &str,
    ) -> String {
        if !should_read(event, key) {
            return current.to_string();
        }
        match store.value(key).and_then(Value::as_str) {
            Some(value) if self.default_re.is_match(value) => fallback.to_string(),
            Some(value) => value.to_string(),
            None => {
                warn_missing(key);
                current.to_string()
            }
        }
    }
}

fn should_read(event: Option<&ChangeEvent>, key: &str) -> bool {
    event.is_none_or(|e| e.affects(key))
}

fn warn_missing(key: &str) {
    log::warn!("Setting {key} missing or mistyped, keeping previous value");
}

fn read_bool(
    store: &SettingsStore,
    event: Option<&ChangeEvent>,
    key: &str,
    current: bool,
) -> bool {
    if !should_read(event, key) {
        return current;
    }
    match store.value(key).and_then(Value::as_bool) {
        Some(value) => value,
        None => {
            warn_missing(key);
            current
        }
    }
}

fn read_int(store: &SettingsStore, event: Option<&ChangeEvent>, key: &str, current: u32) -> u32 {
    if !should_read(event, key) {
        return current;
    }
    match store
        .value(key)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
    {
        Some(value) => value,
        None => {
            warn_missing(key);
            current
        }
    }
}

fn read_enum<T>(store: &SettingsStore, event: Option<&ChangeEvent>, key: &str, current: T) -> T
where
    T: TryFrom<u8> + Copy,
{
    if !should_read(event, key) {
        return current;
    }
    let decoded = store
        .value(key)
        .and_then(Value::as_u64)
        .and_then(|v| u8::try_from(v).ok())
        .and_then(|code| T::try_from(code).ok());
    match decoded {
        Some(value) => value,
        None => {
            warn_missing(key);
            current
        }
    }
}
