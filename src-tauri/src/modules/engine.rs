// Seams to the embedded browser engine. Pure traits - the Tauri implementation
// lives in the binary, tests use doubles.

use url::Url;

use crate::error::Result;
use crate::modules::events::ViewEventSender;
use crate::state::TabId;

/// One engine instance rendering one tab.
pub trait EngineView: Send {
    fn navigate(&mut self, url: &Url) -> Result<()>;
    fn back(&mut self) -> Result<()>;
    fn forward(&mut self) -> Result<()>;
    fn reload(&mut self) -> Result<()>;
    fn run_script(&mut self, script: &str) -> Result<()>;

    /// Called when the tab gains or loses the selection.
    fn set_active(&mut self, _active: bool) -> Result<()> {
        Ok(())
    }

    /// Called once when the tab is closed.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

pub trait EngineFactory: Send {
    /// Builds the engine view for a new tab. `events` is the tab's event stream.
    fn create(&mut self, tab: TabId, url: &Url, events: ViewEventSender) -> Result<Box<dyn EngineView>>;
}

/// Decides whether a page may navigate to `url`.
pub trait NavigationPolicyProvider: Send + Sync {
    fn allow_navigation(&self, url: &Url) -> bool;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AllowAllNavigation;

impl NavigationPolicyProvider for AllowAllNavigation {
    fn allow_navigation(&self, _url: &Url) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_all_navigation() {
        let policy = AllowAllNavigation;
        for raw in ["https://example.com/", "file:///tmp/x.html", "about:blank"] {
            assert!(policy.allow_navigation(&Url::parse(raw).unwrap()));
        }
    }
}
