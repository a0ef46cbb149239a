//! Main shell: composes the tab registry and navigation bar, owns theme and
//! full-screen state, and reacts to engine events.
//!
//! All mutation happens on the thread that owns the shell. Engine callbacks
//! only enqueue through their [`ViewEventSender`](crate::modules::events::ViewEventSender);
//! [`MainShell::process_events`] applies them.

use std::sync::{Mutex, TryLockError};

use crate::error::Result;
use crate::modules::dialogs::{SettingsDialog, SignupDialog, SignupRecord};
use crate::modules::engine::EngineFactory;
use crate::modules::events::{FullScreenRequest, TabEvent, ViewEvent};
use crate::modules::navbar::{NavBarStyle, NavCommand, NavigationBar};
use crate::modules::navigation::resolve_input;
use crate::modules::tabs::TabRegistry;
use crate::modules::view::BrowserView;
use crate::settings::{Settings, Theme};
use crate::state::{TabId, TabStripPayload};

pub const INSPECT_SCRIPT: &str = "console.log('Inspecting...')";
pub const HOME_TAB_LABEL: &str = "Home";
pub const NEW_TAB_LABEL: &str = "New Tab";

/// The window hosting the toolbar and tab views.
pub trait ShellWindow: Send {
    fn set_full_screen(&mut self, full_screen: bool) -> Result<()>;
    fn apply_style(&mut self, style: &NavBarStyle) -> Result<()>;
    fn set_url_text(&mut self, text: &str) -> Result<()>;
    fn update_tabs(&mut self, payload: &TabStripPayload) -> Result<()>;
    fn show_settings(&mut self, dialog: &SettingsDialog) -> Result<()>;
    fn show_signup(&mut self, dialog: &SignupDialog) -> Result<()>;
}

pub struct MainShell {
    settings: Settings,
    tabs: TabRegistry,
    navbar: NavigationBar,
    theme: Theme,
    full_screen: bool,
    window: Box<dyn ShellWindow>,
}

impl MainShell {
    /// Builds the shell with one tab at the home URL.
    pub fn new(settings: Settings, factory: Box<dyn EngineFactory>, window: Box<dyn ShellWindow>) -> Result<Self> {
        let mut shell = Self {
            tabs: TabRegistry::new(settings.home_url(), factory),
            navbar: NavigationBar::new(settings.theme),
            theme: settings.theme,
            full_screen: false,
            window,
            settings,
        };
        shell.tabs.add(None, HOME_TAB_LABEL)?;
        shell.render_all();
        Ok(shell)
    }

    /// Pushes style, URL field and tab strip to the window again, e.g. once
    /// the toolbar page has loaded.
    pub fn render_all(&mut self) {
        let style = self.navbar.style().clone();
        report("apply style", self.window.apply_style(&style));
        self.refresh_url_field();
        self.render_tabs();
    }

    pub fn tabs(&self) -> &TabRegistry {
        &self.tabs
    }

    pub fn navbar(&self) -> &NavigationBar {
        &self.navbar
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn is_full_screen(&self) -> bool {
        self.full_screen
    }

    pub fn dispatch(&mut self, command: NavCommand) {
        log::debug!("[Shell] {:?}", command);
        match command {
            NavCommand::Back => self.with_current_view("back", |view| view.back().map(drop)),
            NavCommand::Forward => self.with_current_view("forward", |view| view.forward().map(drop)),
            NavCommand::Reload => self.with_current_view("reload", BrowserView::reload),
            NavCommand::Home => {
                let home = self.tabs.home_url().clone();
                self.with_current_view("home", |view| view.navigate(&home));
            }
            NavCommand::NewTab => {
                self.new_tab();
            }
            NavCommand::ToggleTheme => self.toggle_theme(),
            NavCommand::OpenSettings => self.open_settings(),
            NavCommand::OpenSignup => {
                self.open_signup();
            }
            NavCommand::Inspect => self.with_current_view("inspect", |view| view.run_script(INSPECT_SCRIPT)),
            NavCommand::Submit(text) => self.submit_url(&text),
            NavCommand::SelectTab(id) => self.select_tab(id),
            NavCommand::CloseTab(id) => self.close_tab(id),
            NavCommand::ReorderTabs(order) => {
                if self.tabs.reorder(&order) {
                    self.render_tabs();
                }
            }
        }
    }

    /// Runs a command raised from inside a tab's own view, such as its context
    /// menu. The tab is brought to the front first. Returns false if it is gone.
    pub fn dispatch_for(&mut self, tab: TabId, command: NavCommand) -> bool {
        if self.tabs.get(tab).is_none() {
            log::debug!("[Shell] Dropping {:?} for closed {}", command, tab);
            return false;
        }
        if self.tabs.current() != Some(tab) {
            self.select_tab(tab);
        }
        self.dispatch(command);
        true
    }

    pub fn new_tab(&mut self) -> Option<TabId> {
        let home = self.tabs.home_url().clone();
        match self.tabs.add(Some(home), NEW_TAB_LABEL) {
            Ok(id) => {
                self.refresh_url_field();
                self.render_tabs();
                Some(id)
            }
            Err(e) => {
                log::error!("[Shell] New tab failed: {}", e);
                None
            }
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        let style = self.navbar.apply_theme(self.theme).clone();
        log::info!("[Shell] Theme is now {}", self.theme.as_str());
        report("apply style", self.window.apply_style(&style));
    }

    /// Navigates the current tab to URL bar text. Unusable input is logged and ignored.
    pub fn submit_url(&mut self, text: &str) {
        match resolve_input(text, &self.settings.default_scheme) {
            Ok(url) => self.with_current_view("navigate", |view| view.navigate(&url)),
            Err(e) => log::warn!("[Shell] Ignoring URL bar input: {}", e),
        }
    }

    pub fn select_tab(&mut self, id: TabId) {
        if self.tabs.select(id) {
            self.refresh_url_field();
            self.render_tabs();
        }
    }

    pub fn close_tab(&mut self, id: TabId) {
        let before = self.tabs.current();
        if self.tabs.close(id) {
            if self.tabs.current() != before {
                self.refresh_url_field();
            }
            self.render_tabs();
        }
    }

    pub fn open_settings(&mut self) {
        report("show settings", self.window.show_settings(&SettingsDialog::default()));
    }

    /// Opens a fresh signup dialog.
    pub fn open_signup(&mut self) -> SignupDialog {
        let dialog = SignupDialog::new();
        report("show signup", self.window.show_signup(&dialog));
        dialog
    }

    pub fn submit_signup(&mut self, dialog: SignupDialog) -> SignupRecord {
        let record = dialog.submit();
        log::info!(target: "signup", "User signed up: {}", record.username);
        record
    }

    /// Applies every queued engine event. Returns how many were handled.
    pub fn process_events(&mut self) -> usize {
        let events = self.tabs.events_mut().drain();
        let count = events.len();
        let mut tabs_dirty = false;
        for event in events {
            tabs_dirty |= self.handle_event(event);
        }
        if tabs_dirty {
            self.render_tabs();
        }
        count
    }

    /// Returns true when the tab strip needs re-rendering.
    fn handle_event(&mut self, TabEvent { tab, event }: TabEvent) -> bool {
        match event {
            ViewEvent::UrlChanged(url) => {
                let is_current = self.tabs.current() == Some(tab);
                let Some(entry) = self.tabs.get_mut(tab) else {
                    return false;
                };
                entry.view.on_url_changed(url.clone());
                if is_current {
                    self.set_url_field(url.to_string());
                }
                true
            }
            ViewEvent::FullScreenRequested(request) => {
                self.handle_full_screen_request(request);
                false
            }
        }
    }

    pub fn handle_full_screen_request(&mut self, request: FullScreenRequest) {
        self.full_screen = request.toggle_on();
        log::info!("[Shell] Full screen {}", if self.full_screen { "on" } else { "off" });
        report("set full screen", self.window.set_full_screen(self.full_screen));
        request.accept();
    }

    fn with_current_view<F>(&mut self, action: &str, f: F)
    where
        F: FnOnce(&mut BrowserView) -> Result<()>,
    {
        match self.tabs.current_tab_mut() {
            Some(tab) => {
                if let Err(e) = f(&mut tab.view) {
                    log::warn!("[Shell] {} on {} failed: {}", action, tab.id, e);
                }
            }
            None => log::warn!("[Shell] {} with no current tab", action),
        }
    }

    fn refresh_url_field(&mut self) {
        if let Some(text) = self.tabs.current_tab().map(|t| t.view.current_url().to_string()) {
            self.set_url_field(text);
        }
    }

    fn set_url_field(&mut self, text: String) {
        report("set url text", self.window.set_url_text(&text));
        self.navbar.set_url_text(text);
    }

    fn render_tabs(&mut self) {
        let payload = self.tabs.snapshot();
        report("update tabs", self.window.update_tabs(&payload));
    }
}

/// Outcome of [`try_pump`].
#[derive(Debug, PartialEq, Eq)]
pub enum Pump {
    Drained(usize),
    Busy,
    Poisoned,
}

/// Drains queued engine events without blocking on the shell lock.
///
/// `Busy` means another caller holds the shell; retry once it is released.
pub fn try_pump(shell: &Mutex<MainShell>) -> Pump {
    match shell.try_lock() {
        Ok(mut shell) => Pump::Drained(shell.process_events()),
        Err(TryLockError::WouldBlock) => Pump::Busy,
        Err(TryLockError::Poisoned(_)) => Pump::Poisoned,
    }
}

fn report(what: &str, result: Result<()>) {
    if let Err(e) = result {
        log::warn!("[Shell] Window failed to {}: {}", what, e);
    }
}
