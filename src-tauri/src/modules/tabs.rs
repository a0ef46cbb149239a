// Tab registry - ordered tabs plus the current selection.
// Follows strict modular monolith pattern: no Tauri imports, engines come in
// through the EngineFactory seam.

use std::collections::HashMap;

use url::Url;

use crate::error::Result;
use crate::modules::engine::EngineFactory;
use crate::modules::events::EventHub;
use crate::modules::view::BrowserView;
use crate::state::{TabId, TabSnapshot, TabStripPayload};

pub struct Tab {
    pub id: TabId,
    pub label: String,
    pub view: BrowserView,
}

impl Tab {
    pub fn snapshot(&self) -> TabSnapshot {
        TabSnapshot {
            id: self.id,
            webview_label: self.id.webview_label(),
            label: self.label.clone(),
            url: self.view.current_url().to_string(),
            can_go_back: self.view.can_go_back(),
            can_go_forward: self.view.can_go_forward(),
        }
    }
}

pub struct TabRegistry {
    tabs: Vec<Tab>,
    current: Option<TabId>,
    next_id: u64,
    home_url: Url,
    factory: Box<dyn EngineFactory>,
    events: EventHub,
}

impl TabRegistry {
    pub fn new(home_url: Url, factory: Box<dyn EngineFactory>) -> Self {
        Self {
            tabs: Vec::new(),
            current: None,
            next_id: 1,
            home_url,
            factory,
            events: EventHub::new(),
        }
    }

    pub fn home_url(&self) -> &Url {
        &self.home_url
    }

    /// Opens a tab at `initial_url` (home when `None`) and selects it.
    ///
    /// Only an engine failure can make this fail; the registry is then unchanged.
    pub fn add(&mut self, initial_url: Option<Url>, label: &str) -> Result<TabId> {
        let url = initial_url.unwrap_or_else(|| self.home_url.clone());
        let id = TabId(self.next_id);
        self.next_id += 1;

        let sender = self.events.subscribe(id);
        let engine = match self.factory.create(id, &url, sender) {
            Ok(engine) => engine,
            Err(e) => {
                self.events.unsubscribe(id);
                return Err(e);
            }
        };

        log::info!("[Tabs] Opened {} at {}", id, url);
        self.tabs.push(Tab {
            id,
            label: label.to_string(),
            view: BrowserView::new(engine, url),
        });
        self.select(id);
        Ok(id)
    }

    /// Closes a tab unless it is the last one. Returns whether it was removed.
    ///
    /// Closing the current tab selects the tab before it, or the new first tab.
    pub fn close(&mut self, id: TabId) -> bool {
        if self.tabs.len() <= 1 {
            log::debug!("[Tabs] Refusing to close the last tab");
            return false;
        }
        let Some(index) = self.index_of(id) else {
            return false;
        };

        let mut tab = self.tabs.remove(index);
        self.events.unsubscribe(id);
        if let Err(e) = tab.view.close() {
            log::warn!("[Tabs] Engine teardown for {} failed: {}", id, e);
        }
        log::info!("[Tabs] Closed {}", id);

        if self.current == Some(id) {
            let next = self.tabs[index.saturating_sub(1)].id;
            self.current = None;
            self.select(next);
        }
        true
    }

    /// Selects a tab. Unknown or closed handles are ignored.
    pub fn select(&mut self, id: TabId) -> bool {
        if self.index_of(id).is_none() {
            return false;
        }
        if self.current == Some(id) {
            return true;
        }

        if let Some(previous) = self.current {
            if let Some(tab) = self.get_mut(previous) {
                if let Err(e) = tab.view.set_active(false) {
                    log::warn!("[Tabs] Failed to hide {}: {}", previous, e);
                }
            }
        }
        self.current = Some(id);
        if let Some(tab) = self.get_mut(id) {
            if let Err(e) = tab.view.set_active(true) {
                log::warn!("[Tabs] Failed to show {}: {}", id, e);
            }
        }
        true
    }

    pub fn current(&self) -> Option<TabId> {
        self.current
    }

    pub fn current_tab(&self) -> Option<&Tab> {
        self.current.and_then(|id| self.get(id))
    }

    pub fn current_tab_mut(&mut self) -> Option<&mut Tab> {
        let id = self.current?;
        self.get_mut(id)
    }

    pub fn get(&self, id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn ids(&self) -> Vec<TabId> {
        self.tabs.iter().map(|t| t.id).collect()
    }

    pub fn events_mut(&mut self) -> &mut EventHub {
        &mut self.events
    }

    /// Applies a tab strip drag. Returns whether the order changed.
    pub fn reorder(&mut self, new_order: &[TabId]) -> bool {
        let changed = reorder_logic(&mut self.tabs, new_order);
        if changed {
            log::debug!("[Tabs] New order: {:?}", self.ids());
        }
        changed
    }

    pub fn snapshot(&self) -> TabStripPayload {
        TabStripPayload {
            tabs: self.tabs.iter().map(Tab::snapshot).collect(),
            active_tab_id: self.current,
        }
    }

    fn index_of(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }
}

/// Pure logic for reordering tabs.
/// Returns true if the order changed, false otherwise.
///
/// Algorithm:
/// 1. Map existing tabs by ID for O(1) lookup
/// 2. Rebuild vector based on new_order
/// 3. Append any missing tabs in their previous order (never drops a tab)
fn reorder_logic(tabs: &mut Vec<Tab>, new_order: &[TabId]) -> bool {
    if tabs.is_empty() || new_order.is_empty() {
        return false;
    }

    let old_order: Vec<TabId> = tabs.iter().map(|t| t.id).collect();
    let mut tab_map: HashMap<TabId, Tab> = tabs.drain(..).map(|t| (t.id, t)).collect();

    let mut reordered = Vec::with_capacity(old_order.len());
    for id in new_order {
        if let Some(tab) = tab_map.remove(id) {
            reordered.push(tab);
        }
    }
    for id in &old_order {
        if let Some(tab) = tab_map.remove(id) {
            reordered.push(tab);
        }
    }

    let changed = reordered.iter().map(|t| t.id).ne(old_order.iter().copied());
    *tabs = reordered;
    changed
}
