//! Navigation bar: toolbar commands, URL field and theme styling.

use serde::{Deserialize, Serialize};

use crate::settings::Theme;
use crate::state::TabId;

/// Everything the toolbar can ask for. Each maps to exactly one delegated call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum NavCommand {
    Back,
    Forward,
    Reload,
    Home,
    NewTab,
    ToggleTheme,
    OpenSettings,
    OpenSignup,
    Inspect,
    Submit(String),
    SelectTab(TabId),
    CloseTab(TabId),
    ReorderTabs(Vec<TabId>),
}

/// Id of the "Inspect" entry in a tab's context menu.
pub const INSPECT_MENU_ID: &str = "inspect";

impl NavCommand {
    /// Command behind a context menu entry, if the id is one of ours.
    pub fn from_menu_id(id: &str) -> Option<Self> {
        match id {
            INSPECT_MENU_ID => Some(NavCommand::Inspect),
            _ => None,
        }
    }
}

/// Colors applied to the toolbar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavBarStyle {
    pub theme: Theme,
    pub toolbar_background: String,
    pub button_background: String,
    pub button_text: String,
    pub button_hover: String,
    pub field_background: String,
    pub field_text: String,
}

impl NavBarStyle {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                theme,
                toolbar_background: "#444".to_string(),
                button_background: "#555".to_string(),
                button_text: "white".to_string(),
                button_hover: "#777".to_string(),
                field_background: "#222".to_string(),
                field_text: "white".to_string(),
            },
            Theme::Light => Self {
                theme,
                toolbar_background: "#fff".to_string(),
                button_background: "#eee".to_string(),
                button_text: "black".to_string(),
                button_hover: "#ddd".to_string(),
                field_background: "#fff".to_string(),
                field_text: "black".to_string(),
            },
        }
    }

    /// Stylesheet for the toolbar page.
    pub fn to_css(&self) -> String {
        format!(
            "#toolbar {{ background-color: {}; padding: 5px; border: 2px solid red; }}\n\
             #toolbar button {{ background-color: {}; color: {}; border-radius: 5px; padding: 5px; }}\n\
             #toolbar button:hover {{ background-color: {}; }}\n\
             #url-bar {{ background-color: {}; color: {}; border: none; padding: 5px; border-radius: 5px; font-size: 14px; width: 400px; }}\n",
            self.toolbar_background,
            self.button_background,
            self.button_text,
            self.button_hover,
            self.field_background,
            self.field_text,
        )
    }
}

/// URL field text and applied style. Holds no tab state of its own.
#[derive(Debug, Clone)]
pub struct NavigationBar {
    url_text: String,
    style: NavBarStyle,
}

impl NavigationBar {
    pub fn new(theme: Theme) -> Self {
        Self {
            url_text: String::new(),
            style: NavBarStyle::for_theme(theme),
        }
    }

    pub fn url_text(&self) -> &str {
        &self.url_text
    }

    pub fn set_url_text(&mut self, text: impl Into<String>) {
        self.url_text = text.into();
    }

    pub fn style(&self) -> &NavBarStyle {
        &self.style
    }

    pub fn apply_theme(&mut self, theme: Theme) -> &NavBarStyle {
        self.style = NavBarStyle::for_theme(theme);
        &self.style
    }
}
