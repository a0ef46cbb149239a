//! BrowserView: one tab's engine instance and its navigation state.

use url::Url;

use crate::error::Result;
use crate::modules::engine::EngineView;

const MAX_HISTORY: usize = 50;

/// Local mirror of the engine's session history.
///
/// Never empty: the first entry is the URL the view was created with.
#[derive(Debug, Clone)]
pub struct NavigationHistory {
    entries: Vec<Url>,
    current: usize,
}

impl NavigationHistory {
    pub fn new(initial: Url) -> Self {
        Self {
            entries: vec![initial],
            current: 0,
        }
    }

    /// Push a new entry, dropping any forward entries.
    pub fn push(&mut self, url: Url) {
        self.entries.truncate(self.current + 1);
        self.entries.push(url);
        self.current = self.entries.len() - 1;

        if self.entries.len() > MAX_HISTORY {
            self.entries.remove(0);
            self.current -= 1;
        }
    }

    pub fn go_back(&mut self) -> bool {
        if self.can_go_back() {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    pub fn go_forward(&mut self) -> bool {
        if self.can_go_forward() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    pub fn can_go_back(&self) -> bool {
        self.current > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.current + 1 < self.entries.len()
    }

    pub fn current(&self) -> &Url {
        &self.entries[self.current]
    }

    pub fn previous(&self) -> Option<&Url> {
        self.current.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    pub fn next(&self) -> Option<&Url> {
        self.entries.get(self.current + 1)
    }

    pub fn entries(&self) -> &[Url] {
        &self.entries
    }
}

/// Traversal issued to the engine whose URL change has not arrived yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pending {
    Back,
    Forward,
    Reload,
}

pub struct BrowserView {
    engine: Box<dyn EngineView>,
    current_url: Url,
    history: NavigationHistory,
    pending: Option<Pending>,
}

impl BrowserView {
    pub fn new(engine: Box<dyn EngineView>, initial_url: Url) -> Self {
        Self {
            engine,
            history: NavigationHistory::new(initial_url.clone()),
            current_url: initial_url,
            pending: None,
        }
    }

    pub fn current_url(&self) -> &Url {
        &self.current_url
    }

    pub fn can_go_back(&self) -> bool {
        self.history.can_go_back()
    }

    pub fn can_go_forward(&self) -> bool {
        self.history.can_go_forward()
    }

    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    /// Returns false without calling the engine when there is nothing behind.
    pub fn back(&mut self) -> Result<bool> {
        if !self.can_go_back() {
            return Ok(false);
        }
        self.engine.back()?;
        self.pending = Some(Pending::Back);
        Ok(true)
    }

    pub fn forward(&mut self) -> Result<bool> {
        if !self.can_go_forward() {
            return Ok(false);
        }
        self.engine.forward()?;
        self.pending = Some(Pending::Forward);
        Ok(true)
    }

    pub fn reload(&mut self) -> Result<()> {
        self.engine.reload()?;
        self.pending = Some(Pending::Reload);
        Ok(())
    }

    pub fn navigate(&mut self, url: &Url) -> Result<()> {
        self.engine.navigate(url)?;
        self.pending = None;
        Ok(())
    }

    pub fn run_script(&mut self, script: &str) -> Result<()> {
        self.engine.run_script(script)
    }

    pub fn set_active(&mut self, active: bool) -> Result<()> {
        self.engine.set_active(active)
    }

    pub fn close(&mut self) -> Result<()> {
        self.engine.close()
    }

    /// Applies an engine-reported URL change. Returns true if the URL differs
    /// from the previous one.
    pub fn on_url_changed(&mut self, url: Url) -> bool {
        let changed = url != self.current_url;
        let pending = self.pending.take();

        if pending == Some(Pending::Back) && self.history.previous() == Some(&url) {
            self.history.go_back();
        } else if pending == Some(Pending::Forward) && self.history.next() == Some(&url) {
            self.history.go_forward();
        } else if !changed {
            // reload, or a redirect back onto the same page
        } else if self.history.previous() == Some(&url) {
            // history.back() from page script
            self.history.go_back();
        } else if self.history.next() == Some(&url) {
            self.history.go_forward();
        } else {
            self.history.push(url.clone());
        }

        self.current_url = url;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::engine::EngineFactory;
    use crate::modules::events::EventHub;
    use crate::modules::test_support::{url, EngineCall, FakeEngines};
    use crate::state::TabId;

    fn view_at(start: &str) -> (BrowserView, FakeEngines) {
        let engines = FakeEngines::default();
        let mut hub = EventHub::new();
        let start = url(start);
        let engine = engines
            .factory()
            .create(TabId(1), &start, hub.subscribe(TabId(1)))
            .unwrap();
        (BrowserView::new(engine, start), engines)
    }

    #[test]
    fn test_new_view_has_no_history() {
        let (mut view, engines) = view_at("https://www.google.com/");
        assert_eq!(view.current_url().as_str(), "https://www.google.com/");
        assert!(!view.can_go_back());
        assert!(!view.can_go_forward());

        assert!(!view.back().unwrap());
        assert!(!view.forward().unwrap());
        assert!(engines.calls(TabId(1)).is_empty());
    }

    #[test]
    fn test_navigation_then_back_and_forward() {
        let (mut view, engines) = view_at("https://page1.com/");

        view.navigate(&url("https://page2.com/")).unwrap();
        assert!(view.on_url_changed(url("https://page2.com/")));
        assert!(view.can_go_back());
        assert!(!view.can_go_forward());

        assert!(view.back().unwrap());
        view.on_url_changed(url("https://page1.com/"));
        assert_eq!(view.current_url().as_str(), "https://page1.com/");
        assert!(!view.can_go_back());
        assert!(view.can_go_forward());

        assert!(view.forward().unwrap());
        view.on_url_changed(url("https://page2.com/"));
        assert!(view.can_go_back());
        assert!(!view.can_go_forward());

        assert_eq!(
            engines.calls(TabId(1)),
            vec![
                EngineCall::Navigate(url("https://page2.com/")),
                EngineCall::Back,
                EngineCall::Forward,
            ]
        );
    }

    #[test]
    fn test_reload_keeps_history() {
        let (mut view, engines) = view_at("https://page1.com/");
        view.reload().unwrap();
        assert!(!view.on_url_changed(url("https://page1.com/")));
        assert_eq!(view.history().entries().len(), 1);
        assert_eq!(engines.calls(TabId(1)), vec![EngineCall::Reload]);
    }

    #[test]
    fn test_link_click_truncates_forward_entries() {
        let (mut view, _) = view_at("https://page1.com/");
        view.on_url_changed(url("https://page2.com/"));
        view.on_url_changed(url("https://page3.com/"));
        view.back().unwrap();
        view.on_url_changed(url("https://page2.com/"));

        // In-page link, no command issued.
        view.on_url_changed(url("https://page4.com/"));
        assert!(!view.can_go_forward());
        assert_eq!(
            view.history().entries(),
            &[url("https://page1.com/"), url("https://page2.com/"), url("https://page4.com/")]
        );
    }

    #[test]
    fn test_script_back_is_recognised() {
        let (mut view, _) = view_at("https://page1.com/");
        view.on_url_changed(url("https://page2.com/"));
        view.on_url_changed(url("https://page1.com/"));
        assert!(!view.can_go_back());
        assert!(view.can_go_forward());
    }

    #[test]
    fn test_history_is_capped() {
        let mut history = NavigationHistory::new(url("https://start.example/"));
        for i in 0..(MAX_HISTORY + 10) {
            history.push(url(&format!("https://example.com/{}", i)));
        }
        assert_eq!(history.entries().len(), MAX_HISTORY);
        assert_eq!(history.current().as_str(), format!("https://example.com/{}", MAX_HISTORY + 9));
        assert!(history.can_go_back());
        assert!(!history.can_go_forward());
    }
}
