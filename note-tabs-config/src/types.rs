//! Tab record and policy enum types shared between the settings model and
//! the tab collection.

use serde::{Deserialize, Serialize};

/// Lifecycle kind of a tab.
///
/// Persisted as integer codes so stored tab arrays stay readable across
/// versions: `Temporary` = 1, `Open` = 2, `Pinned` = 3. `Open` is declared
/// for wire compatibility but currently unused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TabKind {
    /// Replaced in place by the next selected note without a tab.
    Temporary,
    /// Reserved, never produced.
    Open,
    /// Stays until explicitly unpinned or the note disappears.
    Pinned,
}

impl TryFrom<u8> for TabKind {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(TabKind::Temporary),
            2 => Ok(TabKind::Open),
            3 => Ok(TabKind::Pinned),
            other => Err(format!("invalid tab kind code: {other}")),
        }
    }
}

impl From<TabKind> for u8 {
    fn from(kind: TabKind) -> Self {
        match kind {
            TabKind::Temporary => 1,
            TabKind::Open => 2,
            TabKind::Pinned => 3,
        }
    }
}

/// One entry of the persisted tab list.
///
/// The serialized form is `{"id": "...", "type": <code>}`, matching the
/// array layout stored under the `noteTabs` setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteTab {
    /// Opaque note identifier owned by the host application.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TabKind,
}

impl NoteTab {
    pub fn new(id: impl Into<String>, kind: TabKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }
}

/// How a tab is created for a newly selected note without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AddBehavior {
    /// Reuse the single temporary slot (default).
    #[default]
    Temporary,
    /// Every new tab is created pinned.
    Pinned,
}

impl AddBehavior {
    /// Display name for the settings UI.
    pub fn display_name(&self) -> &'static str {
        match self {
            AddBehavior::Temporary => "Temporary",
            AddBehavior::Pinned => "Pinned",
        }
    }

    /// All behaviors in option order.
    pub fn all() -> &'static [AddBehavior] {
        &[AddBehavior::Temporary, AddBehavior::Pinned]
    }
}

impl TryFrom<u8> for AddBehavior {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AddBehavior::Temporary),
            1 => Ok(AddBehavior::Pinned),
            other => Err(format!("invalid add behavior code: {other}")),
        }
    }
}

impl From<AddBehavior> for u8 {
    fn from(value: AddBehavior) -> Self {
        match value {
            AddBehavior::Temporary => 0,
            AddBehavior::Pinned => 1,
        }
    }
}

/// Which note gets selected after the active tab is unpinned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum UnpinBehavior {
    /// Keep the note selected; its tab reappears as a temporary tab.
    #[default]
    Keep,
    /// Select the last active note, falling back to an adjacent tab.
    LastActive,
    /// Select the left neighbor, falling back to the right one.
    LeftTab,
    /// Select the right neighbor, falling back to the left one.
    RightTab,
}

impl UnpinBehavior {
    /// Display name for the settings UI.
    pub fn display_name(&self) -> &'static str {
        match self {
            UnpinBehavior::Keep => "Keep selected",
            UnpinBehavior::LastActive => "Select last active tab",
            UnpinBehavior::LeftTab => "Select left tab",
            UnpinBehavior::RightTab => "Select right tab",
        }
    }

    /// All behaviors in option order.
    pub fn all() -> &'static [UnpinBehavior] {
        &[
            UnpinBehavior::Keep,
            UnpinBehavior::LastActive,
            UnpinBehavior::LeftTab,
            UnpinBehavior::RightTab,
        ]
    }
}

impl TryFrom<u8> for UnpinBehavior {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(UnpinBehavior::Keep),
            1 => Ok(UnpinBehavior::LastActive),
            2 => Ok(UnpinBehavior::LeftTab),
            3 => Ok(UnpinBehavior::RightTab),
            other => Err(format!("invalid unpin behavior code: {other}")),
        }
    }
}

impl From<UnpinBehavior> for u8 {
    fn from(value: UnpinBehavior) -> Self {
        match value {
            UnpinBehavior::Keep => 0,
            UnpinBehavior::LastActive => 1,
            UnpinBehavior::LeftTab => 2,
            UnpinBehavior::RightTab => 3,
        }
    }
}

/// Panel layout orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum LayoutMode {
    /// Switch between horizontal and vertical based on panel width.
    #[default]
    Auto,
    Horizontal,
    Vertical,
}

impl LayoutMode {
    /// Display name for the settings UI.
    pub fn display_name(&self) -> &'static str {
        match self {
            LayoutMode::Auto => "Auto",
            LayoutMode::Horizontal => "Horizontal",
            LayoutMode::Vertical => "Vertical",
        }
    }

    /// All modes in option order.
    pub fn all() -> &'static [LayoutMode] {
        &[LayoutMode::Auto, LayoutMode::Horizontal, LayoutMode::Vertical]
    }
}

impl TryFrom<u8> for LayoutMode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(LayoutMode::Auto),
            1 => Ok(LayoutMode::Horizontal),
            2 => Ok(LayoutMode::Vertical),
            other => Err(format!("invalid layout mode code: {other}")),
        }
    }
}

impl From<LayoutMode> for u8 {
    fn from(value: LayoutMode) -> Self {
        match value {
            LayoutMode::Auto => 0,
            LayoutMode::Horizontal => 1,
            LayoutMode::Vertical => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_kind_serializes_as_integer_code() {
        let tab = NoteTab::new("abc", TabKind::Pinned);
        let json = serde_json::to_string(&tab).unwrap();
        assert_eq!(json, r#"{"id":"abc","type":3}"#);
    }

    #[test]
    fn tab_kind_deserializes_from_integer_code() {
        let tab: NoteTab = serde_json::from_str(r#"{"id":"abc","type":1}"#).unwrap();
        assert_eq!(tab.kind, TabKind::Temporary);
    }

    #[test]
    fn invalid_tab_kind_code_is_rejected() {
        let result: Result<NoteTab, _> = serde_json::from_str(r#"{"id":"abc","type":7}"#);
        assert!(result.is_err());
    }

    #[test]
    fn tab_list_round_trips_in_order() {
        let tabs = vec![
            NoteTab::new("a", TabKind::Pinned),
            NoteTab::new("b", TabKind::Temporary),
            NoteTab::new("c", TabKind::Pinned),
        ];
        let json = serde_json::to_string(&tabs).unwrap();
        let loaded: Vec<NoteTab> = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, tabs);
    }

    #[test]
    fn policy_enums_round_trip_option_codes() {
        for &behavior in UnpinBehavior::all() {
            let code = serde_json::to_string(&behavior).unwrap();
            let back: UnpinBehavior = serde_json::from_str(&code).unwrap();
            assert_eq!(back, behavior);
        }
        for &mode in LayoutMode::all() {
            let code = serde_json::to_string(&mode).unwrap();
            let back: LayoutMode = serde_json::from_str(&code).unwrap();
            assert_eq!(back, mode);
        }
    }
}
