//! Registration descriptors for every setting.
//!
//! The Rust rendition of the host-side settings registration: each option is
//! declared once with its key, kind, default value and UI metadata. The
//! descriptors seed missing keys in the [`SettingsStore`](crate::SettingsStore)
//! and document the persisted layout.

use serde_json::{Value, json};

use crate::types::{AddBehavior, LayoutMode, UnpinBehavior};

/// Settings section all options are grouped under.
pub const SECTION: &str = "note.tabs.settings";

/// Key of the private array-valued setting holding the tab list.
pub const NOTE_TABS_KEY: &str = "noteTabs";

/// Value type of a registered setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKind {
    Bool,
    Int,
    String,
    Array,
}

/// Declaration of a single setting.
#[derive(Debug, Clone)]
pub struct SettingSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub section: &'static str,
    /// Shown in the host settings UI; private state otherwise.
    pub public: bool,
    /// Tucked behind the "advanced" fold of the settings UI.
    pub advanced: bool,
    pub kind: SettingKind,
    pub default: Value,
    /// Display names of enum options, in code order. Empty for non-enums.
    pub options: &'static [&'static str],
}

impl SettingSpec {
    fn new(
        key: &'static str,
        label: &'static str,
        description: &'static str,
        kind: SettingKind,
        default: Value,
    ) -> Self {
        Self {
            key,
            label,
            description,
            section: SECTION,
            public: true,
            advanced: false,
            kind,
            default,
            options: &[],
        }
    }
}

/// All setting declarations, in registration order.
pub fn all_specs() -> Vec<SettingSpec> {
    vec![
        SettingSpec {
            public: false,
            ..SettingSpec::new(
                NOTE_TABS_KEY,
                "Note tabs",
                "",
                SettingKind::Array,
                json!([]),
            )
        },
        SettingSpec::new(
            "enableDragAndDrop",
            "Enable drag & drop of tabs",
            "If disabled, position of tabs can be changed via commands or move buttons.",
            SettingKind::Bool,
            json!(true),
        ),
        SettingSpec::new(
            "showTodoCheckboxes",
            "Show to-do checkboxes on tabs",
            "If enabled, to-dos can be completed directly on the tabs.",
            SettingKind::Bool,
            json!(false),
        ),
        SettingSpec::new(
            "showBreadcrumbs",
            "Show breadcrumbs below tabs",
            "Display full breadcrumbs for selected note below tabs. Only available in horizontal layout mode.",
            SettingKind::Bool,
            json!(false),
        ),
        SettingSpec::new(
            "showNavigationButtons",
            "Show navigation buttons below tabs",
            "Display history backward and forward buttons before the breadcrumbs. Only visible if breadcrumbs are also enabled and visible.",
            SettingKind::Bool,
            json!(false),
        ),
        SettingSpec::new(
            "pinEditedNotes",
            "Automatically pin notes when edited",
            "Pin notes automatically as soon as the title, content or any other attribute changes.",
            SettingKind::Bool,
            json!(false),
        ),
        SettingSpec::new(
            "unpinCompletedTodos",
            "Automatically unpin completed to-dos",
            "Unpin notes automatically as soon as the to-do status changes to completed. Removes the tab completely unless it is the selected note.",
            SettingKind::Bool,
            json!(false),
        ),
        SettingSpec {
            options: &["Temporary", "Pinned"],
            ..SettingSpec::new(
                "addBehavior",
                "Add new tab behavior",
                "Specify the type of newly added tabs. Either temporary, replacing the current temporary tab, or directly pinned.",
                SettingKind::Int,
                json!(u8::from(AddBehavior::Temporary)),
            )
        },
        SettingSpec {
            options: &[
                "Keep selected",
                "Select last active tab",
                "Select left tab",
                "Select right tab",
            ],
            ..SettingSpec::new(
                "unpinBehavior",
                "Unpin active tab behavior",
                "Specify behavior when unpinning the current active tab. Either keep the note selected (its tab reappears as temporary tab), or select the last active, left or right tab instead.",
                SettingKind::Int,
                json!(u8::from(UnpinBehavior::Keep)),
            )
        },
        SettingSpec {
            options: &["Auto", "Horizontal", "Vertical"],
            ..SettingSpec::new(
                "layoutMode",
                "Force tabs layout",
                "Force tabs horizontal or vertical layout. If Auto, the layout switches automatically at a width of about 400px.",
                SettingKind::Int,
                json!(u8::from(LayoutMode::Auto)),
            )
        },
        SettingSpec {
            advanced: true,
            ..SettingSpec::new(
                "tabHeight",
                "Note Tabs height (px)",
                "Height of the tabs. Row height in vertical layout.",
                SettingKind::Int,
                json!(35),
            )
        },
        SettingSpec {
            advanced: true,
            ..SettingSpec::new(
                "minTabWidth",
                "Minimum Tab width (px)",
                "Minimum width of one tab in pixel.",
                SettingKind::Int,
                json!(50),
            )
        },
        SettingSpec {
            advanced: true,
            ..SettingSpec::new(
                "maxTabWidth",
                "Maximum Tab width (px)",
                "Maximum width of one tab in pixel.",
                SettingKind::Int,
                json!(150),
            )
        },
        SettingSpec {
            advanced: true,
            ..SettingSpec::new(
                "breadcrumbsMinWidth",
                "Minimum breadcrumb width (px)",
                "Minimum width of one breadcrumb in pixel.",
                SettingKind::Int,
                json!(10),
            )
        },
        SettingSpec {
            advanced: true,
            ..SettingSpec::new(
                "breadcrumbsMaxWidth",
                "Maximum breadcrumb width (px)",
                "Maximum width of one breadcrumb in pixel.",
                SettingKind::Int,
                json!(100),
            )
        },
        SettingSpec {
            advanced: true,
            ..SettingSpec::new(
                "fontFamily",
                "Font family",
                "Font family used in the panel. Font families other than 'default' must be installed on the system.",
                SettingKind::String,
                json!("default"),
            )
        },
        SettingSpec {
            advanced: true,
            ..SettingSpec::new(
                "fontSize",
                "Font size",
                "Font size used in the panel. Values other than 'default' must be specified in valid CSS syntax, e.g. '13px'.",
                SettingKind::String,
                json!("default"),
            )
        },
        SettingSpec {
            advanced: true,
            ..SettingSpec::new(
                "mainBackground",
                "Background color",
                "Main background color of the panel.",
                SettingKind::String,
                json!("default"),
            )
        },
        SettingSpec {
            advanced: true,
            ..SettingSpec::new(
                "hoverBackground",
                "Hover background color",
                "Background color used when hovering a tab.",
                SettingKind::String,
                json!("default"),
            )
        },
        SettingSpec {
            advanced: true,
            ..SettingSpec::new(
                "activeBackground",
                "Active background color",
                "Background color of the current active tab.",
                SettingKind::String,
                json!("default"),
            )
        },
        SettingSpec {
            advanced: true,
            ..SettingSpec::new(
                "breadcrumbsBackground",
                "Breadcrumbs background color",
                "Background color of the breadcrumbs.",
                SettingKind::String,
                json!("default"),
            )
        },
        SettingSpec {
            advanced: true,
            ..SettingSpec::new(
                "mainForeground",
                "Foreground color",
                "Foreground color used for text and icons.",
                SettingKind::String,
                json!("default"),
            )
        },
        SettingSpec {
            advanced: true,
            ..SettingSpec::new(
                "activeForeground",
                "Active foreground color",
                "Foreground color of the current active tab.",
                SettingKind::String,
                json!("default"),
            )
        },
        SettingSpec {
            advanced: true,
            ..SettingSpec::new(
                "dividerColor",
                "Divider color",
                "Color of the divider between the tabs.",
                SettingKind::String,
                json!("default"),
            )
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_unique() {
        let specs = all_specs();
        for (i, a) in specs.iter().enumerate() {
            for b in &specs[i + 1..] {
                assert_ne!(a.key, b.key, "duplicate setting key");
            }
        }
    }

    #[test]
    fn note_tabs_is_the_only_private_setting() {
        for spec in all_specs() {
            assert_eq!(spec.key == NOTE_TABS_KEY, !spec.public, "{}", spec.key);
        }
    }

    #[test]
    fn enum_option_counts_match_variants() {
        let specs = all_specs();
        let by_key = |key: &str| {
            specs
                .iter()
                .find(|s| s.key == key)
                .unwrap_or_else(|| panic!("missing spec {key}"))
                .clone()
        };
        assert_eq!(by_key("addBehavior").options.len(), AddBehavior::all().len());
        assert_eq!(
            by_key("unpinBehavior").options.len(),
            UnpinBehavior::all().len()
        );
        assert_eq!(by_key("layoutMode").options.len(), LayoutMode::all().len());
    }

    #[test]
    fn defaults_match_declared_kinds() {
        for spec in all_specs() {
            let ok = match spec.kind {
                SettingKind::Bool => spec.default.is_boolean(),
                SettingKind::Int => spec.default.is_u64(),
                SettingKind::String => spec.default.is_string(),
                SettingKind::Array => spec.default.is_array(),
            };
            assert!(ok, "default of {} does not match its kind", spec.key);
        }
    }
}
