// Engine and window doubles shared by the unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use url::Url;

use crate::error::{Result, ShellError};
use crate::modules::dialogs::{SettingsDialog, SignupDialog};
use crate::modules::engine::{EngineFactory, EngineView};
use crate::modules::events::ViewEventSender;
use crate::modules::navbar::NavBarStyle;
use crate::modules::shell::ShellWindow;
use crate::state::{TabId, TabStripPayload};

pub fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

#[derive(Clone, Debug, PartialEq)]
pub enum EngineCall {
    Navigate(Url),
    Back,
    Forward,
    Reload,
    RunScript(String),
    SetActive(bool),
    Close,
}

/// Shared view of every fake engine a factory has built.
#[derive(Clone, Default)]
pub struct FakeEngines {
    calls: Arc<Mutex<Vec<(TabId, EngineCall)>>>,
    senders: Arc<Mutex<HashMap<TabId, ViewEventSender>>>,
    fail_next: Arc<AtomicBool>,
}

impl FakeEngines {
    pub fn factory(&self) -> FakeFactory {
        FakeFactory { engines: self.clone() }
    }

    pub fn calls(&self, tab: TabId) -> Vec<EngineCall> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| *t == tab)
            .map(|(_, c)| c.clone())
            .collect()
    }

    /// Calls other than show/hide bookkeeping.
    pub fn commands(&self, tab: TabId) -> Vec<EngineCall> {
        self.calls(tab)
            .into_iter()
            .filter(|c| !matches!(c, EngineCall::SetActive(_)))
            .collect()
    }

    pub fn sender(&self, tab: TabId) -> ViewEventSender {
        self.senders.lock().unwrap().get(&tab).cloned().expect("no engine for tab")
    }

    pub fn fail_next_create(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    fn record(&self, tab: TabId, call: EngineCall) {
        self.calls.lock().unwrap().push((tab, call));
    }
}

pub struct FakeFactory {
    engines: FakeEngines,
}

impl EngineFactory for FakeFactory {
    fn create(&mut self, tab: TabId, _url: &Url, events: ViewEventSender) -> Result<Box<dyn EngineView>> {
        if self.engines.fail_next.swap(false, Ordering::SeqCst) {
            return Err(ShellError::EngineCreate {
                tab,
                reason: "fake failure".to_string(),
            });
        }
        self.engines.senders.lock().unwrap().insert(tab, events);
        Ok(Box::new(FakeEngine {
            tab,
            engines: self.engines.clone(),
        }))
    }
}

pub struct FakeEngine {
    tab: TabId,
    engines: FakeEngines,
}

impl EngineView for FakeEngine {
    fn navigate(&mut self, url: &Url) -> Result<()> {
        self.engines.record(self.tab, EngineCall::Navigate(url.clone()));
        Ok(())
    }

    fn back(&mut self) -> Result<()> {
        self.engines.record(self.tab, EngineCall::Back);
        Ok(())
    }

    fn forward(&mut self) -> Result<()> {
        self.engines.record(self.tab, EngineCall::Forward);
        Ok(())
    }

    fn reload(&mut self) -> Result<()> {
        self.engines.record(self.tab, EngineCall::Reload);
        Ok(())
    }

    fn run_script(&mut self, script: &str) -> Result<()> {
        self.engines.record(self.tab, EngineCall::RunScript(script.to_string()));
        Ok(())
    }

    fn set_active(&mut self, active: bool) -> Result<()> {
        self.engines.record(self.tab, EngineCall::SetActive(active));
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.engines.record(self.tab, EngineCall::Close);
        Ok(())
    }
}

#[derive(Default, Debug)]
pub struct WindowState {
    pub full_screen_calls: Vec<bool>,
    pub url_text: String,
    pub style: Option<NavBarStyle>,
    pub tabs: Option<TabStripPayload>,
    pub settings_shown: usize,
    pub signup_shown: usize,
}

#[derive(Clone, Default)]
pub struct FakeWindow {
    pub state: Arc<Mutex<WindowState>>,
}

impl FakeWindow {
    pub fn url_text(&self) -> String {
        self.state.lock().unwrap().url_text.clone()
    }

    pub fn tabs(&self) -> TabStripPayload {
        self.state.lock().unwrap().tabs.clone().expect("tab strip never rendered")
    }
}

impl ShellWindow for FakeWindow {
    fn set_full_screen(&mut self, full_screen: bool) -> Result<()> {
        self.state.lock().unwrap().full_screen_calls.push(full_screen);
        Ok(())
    }

    fn apply_style(&mut self, style: &NavBarStyle) -> Result<()> {
        self.state.lock().unwrap().style = Some(style.clone());
        Ok(())
    }

    fn set_url_text(&mut self, text: &str) -> Result<()> {
        self.state.lock().unwrap().url_text = text.to_string();
        Ok(())
    }

    fn update_tabs(&mut self, payload: &TabStripPayload) -> Result<()> {
        self.state.lock().unwrap().tabs = Some(payload.clone());
        Ok(())
    }

    fn show_settings(&mut self, _dialog: &SettingsDialog) -> Result<()> {
        self.state.lock().unwrap().settings_shown += 1;
        Ok(())
    }

    fn show_signup(&mut self, _dialog: &SignupDialog) -> Result<()> {
        self.state.lock().unwrap().signup_shown += 1;
        Ok(())
    }
}
