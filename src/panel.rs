//! Panel renderer and webview message protocol.
//!
//! Turns the tab collection, settings and current selection into the HTML
//! document shown in the host's webview panel, and decodes the JSON messages
//! that come back from it. The markup carries inline style attributes driven
//! entirely by settings; the host injects the accompanying stylesheet and
//! script assets.

use std::sync::Arc;

use anyhow::Result;
use serde::Deserialize;

use note_tabs_config::{LayoutMode, Settings, TabKind};

use crate::host::{Host, HostError, NoteDetails};
use crate::tabs::NoteTabs;

/// Messages posted by the panel's webview script, discriminated by `name`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "name")]
pub enum PanelMessage {
    #[serde(rename = "tabsOpen")]
    Open { id: String },
    #[serde(rename = "tabsOpenFolder")]
    OpenFolder { id: String },
    #[serde(rename = "tabsPinNote")]
    PinNote { id: String },
    #[serde(rename = "tabsUnpinNote")]
    UnpinNote { id: String },
    #[serde(rename = "tabsToggleTodo")]
    ToggleTodo { id: String, checked: bool },
    #[serde(rename = "tabsMoveLeft")]
    MoveLeft,
    #[serde(rename = "tabsMoveRight")]
    MoveRight,
    #[serde(rename = "tabsBack")]
    Back,
    #[serde(rename = "tabsForward")]
    Forward,
    #[serde(rename = "tabsDrag")]
    Drag {
        #[serde(rename = "sourceId")]
        source_id: String,
        #[serde(rename = "targetId")]
        target_id: String,
    },
    #[serde(rename = "tabsDragNotes")]
    DragNotes {
        #[serde(rename = "noteIds")]
        note_ids: Vec<String>,
        #[serde(rename = "targetId")]
        target_id: String,
    },
}

impl PanelMessage {
    /// Decode a raw webview message; unknown or malformed messages are
    /// logged and dropped.
    pub fn parse(value: serde_json::Value) -> Option<Self> {
        match serde_json::from_value(value) {
            Ok(message) => Some(message),
            Err(e) => {
                log::debug!("Ignoring unknown panel message: {e}");
                None
            }
        }
    }
}

/// Escape text for use in HTML content and attribute values.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders the tab bar document into the host's webview panel.
pub struct Panel {
    host: Arc<dyn Host>,
}

impl Panel {
    pub fn new(host: Arc<dyn Host>) -> Self {
        Self { host }
    }

    /// Push the initial placeholder document shown until the first real
    /// render.
    pub async fn register(&self, settings: &Settings) -> Result<()> {
        let html = format!(
            concat!(
                "<div id=\"container\" style=\"background:{background};",
                "font-family:'{font_family}',sans-serif;font-size:{font_size};\">\n",
                "  <div id=\"tabs-container\">\n",
                "    <p style=\"padding-left:8px;\">Loading tabs...</p>\n",
                "  </div>\n",
                "</div>"
            ),
            background = settings.background,
            font_family = settings.font_family,
            font_size = settings.font_size,
        );
        self.host.set_panel_html(&html).await?;
        Ok(())
    }

    /// Rebuild the panel document from current state and push it to the
    /// webview. Tabs whose note no longer exists are deleted on the way.
    pub async fn update(&self, tabs: &mut NoteTabs, settings: &Settings) -> Result<()> {
        let selected = self.host.selected_note().await?;
        let tabs_html = self.tabs_html(tabs, settings, selected.as_ref()).await?;
        let controls_html = controls_html(settings);
        let breadcrumbs_html = self.breadcrumbs_html(settings, selected.as_ref()).await?;

        let layout_class = match settings.layout_mode {
            LayoutMode::Auto => "",
            LayoutMode::Horizontal => " horizontal",
            LayoutMode::Vertical => " vertical",
        };

        let html = format!(
            concat!(
                "<div id=\"container\" class=\"tabs{layout_class}\" style=\"background:{background};",
                "font-family:'{font_family}',sans-serif;font-size:{font_size};\">\n",
                "  <div id=\"tabs-container\" role=\"tablist\" draggable=\"{draggable}\" ",
                "ondragend=\"dragEnd(event);\" ondragover=\"dragOver(event, '{hover}');\" ",
                "ondragleave=\"dragLeave(event);\" ondrop=\"drop(event);\">\n",
                "{tabs_html}\n",
                "{controls_html}",
                "  </div>\n",
                "{breadcrumbs_html}",
                "</div>"
            ),
            layout_class = layout_class,
            background = settings.background,
            font_family = settings.font_family,
            font_size = settings.font_size,
            draggable = settings.enable_drag_and_drop,
            hover = settings.hover_background,
            tabs_html = tabs_html,
            controls_html = controls_html,
            breadcrumbs_html = breadcrumbs_html,
        );

        self.host.set_panel_html(&html).await?;
        Ok(())
    }

    /// Toggle the panel between shown and hidden.
    pub async fn toggle_visibility(&self) -> Result<()> {
        let visible = self.host.panel_visible().await?;
        self.host.show_panel(!visible).await?;
        Ok(())
    }

    /// Flip a to-do's completion state from the panel checkbox. Failures are
    /// swallowed; the re-render arrives through the note-change event.
    pub async fn toggle_todo(&self, note_id: &str, checked: bool) {
        let result = async {
            let note = self.host.note(note_id).await?;
            let completed = if note.is_todo && checked {
                chrono::Utc::now().timestamp_millis()
            } else {
                0
            };
            self.host.set_todo_completed(&note.id, completed).await
        }
        .await;
        if let Err(e) = result {
            log::debug!("Toggling to-do {note_id} failed: {e}");
        }
    }

    /// Markup for all tabs. Notes the host no longer knows are removed from
    /// the collection and skipped; completed to-dos are skipped (but kept)
    /// when the host hides them globally.
    async fn tabs_html(
        &self,
        tabs: &mut NoteTabs,
        settings: &Settings,
        selected: Option<&NoteDetails>,
    ) -> Result<String> {
        let show_completed_todos = self.host.show_completed_todos().await?;
        let mut rendered: Vec<String> = Vec::new();

        let snapshot: Vec<_> = tabs.all().to_vec();
        for tab in snapshot {
            let note = match self.host.note(&tab.id).await {
                Ok(note) => note,
                Err(HostError::NotFound) => {
                    log::info!("Removing tab for missing note {}", tab.id);
                    tabs.delete(&tab.id)?;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            if !show_completed_todos && note.is_completed_todo() {
                continue;
            }

            let is_selected = selected.is_some_and(|s| s.id == note.id);
            let (background, foreground) = if is_selected {
                (&settings.active_background, &settings.active_foreground)
            } else {
                (&settings.background, &settings.foreground)
            };
            let new_class = if tab.kind == TabKind::Temporary { " new" } else { "" };
            let (icon, icon_title) = if tab.kind == TabKind::Pinned {
                ("fa-times", "Unpin")
            } else {
                ("fa-thumbtack", "Pin")
            };
            let text_decoration = if note.is_completed_todo() {
                "line-through"
            } else {
                "none"
            };

            let checkbox = if settings.show_todo_checkboxes && note.is_todo {
                let checked = if note.todo_completed != 0 { " checked" } else { "" };
                format!("<input id=\"check\" type=\"checkbox\"{checked}>")
            } else {
                String::new()
            };

            let title = escape_html(&note.title);
            rendered.push(format!(
                concat!(
                    "    <div id=\"tab\" data-id=\"{id}\" data-bg=\"{background}\" ",
                    "draggable=\"{draggable}\" class=\"tab{new_class}\" role=\"tab\" title=\"{title}\" ",
                    "onclick=\"tabClick(event);\" ondblclick=\"pinNote(event);\" ",
                    "onmouseover=\"setBackground(event,'{hover}');\" onmouseout=\"resetBackground(this);\" ",
                    "ondragstart=\"dragStart(event);\" ondragend=\"dragEnd(event);\" ",
                    "ondragover=\"dragOver(event, '{hover}');\" ondragleave=\"dragLeave(event);\" ",
                    "ondrop=\"drop(event);\" ",
                    "style=\"height:{height}px;min-width:{min_width}px;max-width:{max_width}px;",
                    "border-color:{divider};background:{background};\">\n",
                    "      <span class=\"tab-inner\">\n",
                    "        {checkbox}\n",
                    "        <span class=\"tab-title\" style=\"color:{foreground};",
                    "text-decoration:{text_decoration};\">{title}</span>\n",
                    "        <a href=\"#\" id=\"{icon_title}\" class=\"fas {icon}\" ",
                    "title=\"{icon_title}\" style=\"color:{foreground};\"></a>\n",
                    "      </span>\n",
                    "    </div>"
                ),
                id = note.id,
                background = background,
                draggable = settings.enable_drag_and_drop,
                new_class = new_class,
                title = title,
                hover = settings.hover_background,
                height = settings.tab_height,
                min_width = settings.min_tab_width,
                max_width = settings.max_tab_width,
                divider = settings.divider_color,
                checkbox = checkbox,
                foreground = foreground,
                text_decoration = text_decoration,
                icon = icon,
                icon_title = icon_title,
            ));
        }

        Ok(rendered.join("\n"))
    }

    /// Breadcrumb trail of the selected note's parent folders, root first.
    async fn breadcrumbs_html(
        &self,
        settings: &Settings,
        selected: Option<&NoteDetails>,
    ) -> Result<String> {
        if !settings.show_breadcrumbs {
            return Ok(String::new());
        }
        let Some(selected) = selected else {
            return Ok(String::new());
        };

        let navigation = if settings.show_navigation_buttons {
            format!(
                concat!(
                    "    <div class=\"navigation-icons\" style=\"border-color:{divider};\">\n",
                    "      <a href=\"#\" class=\"fas fa-chevron-left\" title=\"Back\" ",
                    "style=\"color:{foreground};\" onclick=\"message('tabsBack');\"></a>\n",
                    "      <a href=\"#\" class=\"fas fa-chevron-right\" title=\"Forward\" ",
                    "style=\"color:{foreground};\" onclick=\"message('tabsForward');\"></a>\n",
                    "    </div>\n"
                ),
                divider = settings.divider_color,
                foreground = settings.foreground,
            )
        } else {
            String::new()
        };

        let parents = self.note_parents(selected.parent_id.as_deref()).await;
        let mut crumbs: Vec<String> = Vec::new();
        for folder in parents.iter().rev() {
            crumbs.push(format!(
                concat!(
                    "    <div class=\"breadcrumb\" data-id=\"{id}\" onclick=\"openFolder(event);\" ",
                    "style=\"min-width:{min_width}px;max-width:{max_width}px;\">\n",
                    "      <span class=\"breadcrumb-inner\">\n",
                    "        <a href=\"#\" class=\"breadcrumb-title\" style=\"color:{foreground};\" ",
                    "title=\"{title}\">{title}</a>\n",
                    "        <span class=\"fas fa-chevron-right\" style=\"color:{foreground};\"></span>\n",
                    "      </span>\n",
                    "    </div>"
                ),
                id = folder.id,
                min_width = settings.breadcrumbs_min_width,
                max_width = settings.breadcrumbs_max_width,
                foreground = settings.foreground,
                title = escape_html(&folder.title),
            ));
        }

        Ok(format!(
            concat!(
                "  <div id=\"breadcrumbs-container\" style=\"background:{background};\">\n",
                "{navigation}",
                "    <div class=\"breadcrumbs-icon\">\n",
                "      <span class=\"fas fa-book\" style=\"color:{foreground};\"></span>\n",
                "    </div>\n",
                "{crumbs}\n",
                "  </div>\n"
            ),
            background = settings.breadcrumbs_background,
            navigation = navigation,
            foreground = settings.foreground,
            crumbs = crumbs.join("\n"),
        ))
    }

    /// Walk the folder chain upwards, leaf first. Stops quietly when a
    /// folder cannot be fetched.
    async fn note_parents(&self, parent_id: Option<&str>) -> Vec<crate::host::Folder> {
        let mut parents = Vec::new();
        let mut next = parent_id.map(str::to_string);
        while let Some(id) = next {
            match self.host.folder(&id).await {
                Ok(folder) => {
                    next = folder.parent_id.clone();
                    parents.push(folder);
                }
                Err(e) => {
                    log::debug!("Stopping breadcrumb walk at {id}: {e}");
                    break;
                }
            }
        }
        parents
    }
}

/// Move buttons shown when drag-and-drop reordering is disabled.
fn controls_html(settings: &Settings) -> String {
    if settings.enable_drag_and_drop {
        return String::new();
    }
    format!(
        concat!(
            "    <div id=\"controls\" style=\"height:{height}px;\">\n",
            "      <a href=\"#\" class=\"fas fa-chevron-left\" title=\"Move active tab left\" ",
            "style=\"color:{foreground};\" onclick=\"message('tabsMoveLeft');\"></a>\n",
            "      <a href=\"#\" class=\"fas fa-chevron-right\" title=\"Move active tab right\" ",
            "style=\"color:{foreground};\" onclick=\"message('tabsMoveRight');\"></a>\n",
            "    </div>\n"
        ),
        height = settings.tab_height,
        foreground = settings.foreground,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_simple_messages() {
        assert_eq!(
            PanelMessage::parse(json!({"name": "tabsOpen", "id": "n1"})),
            Some(PanelMessage::Open { id: "n1".into() })
        );
        assert_eq!(
            PanelMessage::parse(json!({"name": "tabsMoveLeft"})),
            Some(PanelMessage::MoveLeft)
        );
        assert_eq!(
            PanelMessage::parse(json!({"name": "tabsBack"})),
            Some(PanelMessage::Back)
        );
    }

    #[test]
    fn parses_todo_toggle_with_checked_flag() {
        assert_eq!(
            PanelMessage::parse(json!({"name": "tabsToggleTodo", "id": "n1", "checked": true})),
            Some(PanelMessage::ToggleTodo {
                id: "n1".into(),
                checked: true
            })
        );
    }

    #[test]
    fn parses_drag_messages() {
        assert_eq!(
            PanelMessage::parse(json!({"name": "tabsDrag", "sourceId": "a", "targetId": "b"})),
            Some(PanelMessage::Drag {
                source_id: "a".into(),
                target_id: "b".into()
            })
        );
        assert_eq!(
            PanelMessage::parse(
                json!({"name": "tabsDragNotes", "noteIds": ["a", "b"], "targetId": "c"})
            ),
            Some(PanelMessage::DragNotes {
                note_ids: vec!["a".into(), "b".into()],
                target_id: "c".into()
            })
        );
    }

    #[test]
    fn unknown_message_is_dropped() {
        assert_eq!(PanelMessage::parse(json!({"name": "somethingElse"})), None);
        assert_eq!(PanelMessage::parse(json!({"id": "missing name"})), None);
    }

    #[test]
    fn escape_html_neutralizes_markup() {
        assert_eq!(
            escape_html(r#"<b>"a" & 'b'</b>"#),
            "&lt;b&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_html("plain title"), "plain title");
    }

    #[test]
    fn controls_hidden_when_drag_and_drop_enabled() {
        let mut settings = Settings::default();
        settings.enable_drag_and_drop = true;
        assert!(controls_html(&settings).is_empty());
        settings.enable_drag_and_drop = false;
        assert!(controls_html(&settings).contains("tabsMoveLeft"));
    }
}
