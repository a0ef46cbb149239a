// Shared state structs to avoid circular dependencies.
// These are pushed to the toolbar frontend and can be tested independently.

use std::fmt;
use serde::{Deserialize, Serialize};

/// Opaque tab handle. Allocated monotonically and never reused within a process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TabId(pub u64);

impl TabId {
    /// Label of the engine view hosting this tab.
    pub fn webview_label(&self) -> String {
        format!("tab-{}", self.0)
    }

    pub fn from_webview_label(label: &str) -> Option<Self> {
        label.strip_prefix("tab-")?.parse().ok().map(TabId)
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab-{}", self.0)
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabSnapshot {
    pub id: TabId,
    pub webview_label: String,
    pub label: String,
    pub url: String,
    pub can_go_back: bool,
    pub can_go_forward: bool,
}

/// Payload of the `update-tabs` event.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabStripPayload {
    pub tabs: Vec<TabSnapshot>,
    pub active_tab_id: Option<TabId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webview_label_round_trip() {
        assert_eq!(TabId(12).webview_label(), "tab-12");
        assert_eq!(TabId::from_webview_label("tab-12"), Some(TabId(12)));
        assert_eq!(TabId::from_webview_label("toolbar"), None);
        assert_eq!(TabId::from_webview_label("tab-x"), None);
    }

    #[test]
    fn test_payload_is_camel_case() {
        let payload = TabStripPayload {
            tabs: vec![TabSnapshot {
                id: TabId(1),
                webview_label: TabId(1).webview_label(),
                label: "Home".to_string(),
                url: "https://www.google.com/".to_string(),
                can_go_back: false,
                can_go_forward: false,
            }],
            active_tab_id: Some(TabId(1)),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["activeTabId"], 1);
        assert_eq!(json["tabs"][0]["webviewLabel"], "tab-1");
        assert_eq!(json["tabs"][0]["canGoBack"], false);
    }
}
