// Prevents additional console window on Windows in release
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::json;
use tauri::menu::{MenuBuilder, MenuItemBuilder};
use tauri::window::WindowBuilder;
use tauri::{
    AppHandle, Emitter, LogicalPosition, LogicalSize, Manager, PhysicalPosition, PhysicalSize, State, Webview,
    WebviewBuilder, WebviewUrl, Window,
};
use tauri_plugin_dialog::DialogExt;
use url::Url;

use monsearch_browser_lib::error::{Result, ShellError};
use monsearch_browser_lib::modules::dialogs::{SettingsDialog, SignupDialog};
use monsearch_browser_lib::modules::engine::{AllowAllNavigation, EngineFactory, EngineView, NavigationPolicyProvider};
use monsearch_browser_lib::modules::events::{FullScreenDirection, FullScreenRequest, ViewEvent, ViewEventSender};
use monsearch_browser_lib::modules::ipc::{authorize, authorize_tab, ShellCommand, SIGNUP_LABEL, TOOLBAR_LABEL};
use monsearch_browser_lib::modules::navbar::{NavBarStyle, NavCommand, INSPECT_MENU_ID};
use monsearch_browser_lib::modules::shell::{try_pump, MainShell, Pump, ShellWindow};
use monsearch_browser_lib::settings::Settings;
use monsearch_browser_lib::state::{TabId, TabStripPayload};

const TOOLBAR_HEIGHT_LOGICAL: f64 = 56.0 + 28.0;

// Reports page full-screen changes back to the shell. The invoke resolving is
// the acknowledgement the page waits on. Right-click opens the shell's menu.
const TAB_INIT_SCRIPT: &str = r#"
document.addEventListener('fullscreenchange', function () {
    var ipc = window.__TAURI_INTERNALS__;
    if (ipc) {
        ipc.invoke('fullscreen_requested', { enter: !!document.fullscreenElement });
    }
});
document.addEventListener('contextmenu', function (e) {
    var ipc = window.__TAURI_INTERNALS__;
    if (ipc) {
        e.preventDefault();
        ipc.invoke('show_context_menu');
    }
});
"#;

type SenderMap = Arc<Mutex<HashMap<TabId, ViewEventSender>>>;

struct AppState {
    shell: Mutex<MainShell>,
    senders: SenderMap,
    // Tab whose context menu is open.
    menu_target: Mutex<Option<TabId>>,
}

/// Runs `f` on the shell, then applies whatever it queued.
fn with_shell<T>(state: &AppState, f: impl FnOnce(&mut MainShell) -> T) -> std::result::Result<T, String> {
    let mut shell = state.shell.lock().map_err(|e| e.to_string())?;
    let out = f(&mut shell);
    shell.process_events();
    Ok(out)
}

fn engine_err(e: tauri::Error) -> ShellError {
    ShellError::Engine(e.to_string())
}

/// Applies queued engine events on the main thread.
fn schedule_pump(app: &AppHandle) {
    let handle = app.clone();
    let scheduled = app.run_on_main_thread(move || {
        // Not managed yet during setup; the events stay queued for the next pump.
        let Some(state) = handle.try_state::<AppState>() else {
            return;
        };
        match try_pump(&state.shell) {
            Pump::Drained(_) => {}
            // Called inline from under a shell command. Retrying from a worker
            // queues the pump behind it instead of re-entering.
            Pump::Busy => {
                let retry = handle.clone();
                tauri::async_runtime::spawn(async move { schedule_pump(&retry) });
            }
            Pump::Poisoned => log::error!("[Main] Shell lock poisoned"),
        }
    });
    if let Err(e) = scheduled {
        log::warn!("[Main] Failed to schedule event pump: {}", e);
    }
}

/// Places the toolbar on top and every tab view below it.
fn layout(window: &Window, full_screen: bool) -> tauri::Result<()> {
    let size = window.inner_size()?;
    let scale = window.scale_factor()?;
    let toolbar_height = if full_screen {
        0
    } else {
        (TOOLBAR_HEIGHT_LOGICAL * scale) as u32
    };
    let content_height = size.height.saturating_sub(toolbar_height).max(100);

    for webview in window.webviews() {
        let bounds = if webview.label() == TOOLBAR_LABEL {
            tauri::Rect {
                position: tauri::Position::Physical(PhysicalPosition::new(0, 0)),
                size: tauri::Size::Physical(PhysicalSize::new(size.width, toolbar_height)),
            }
        } else if TabId::from_webview_label(webview.label()).is_some() {
            tauri::Rect {
                position: tauri::Position::Physical(PhysicalPosition::new(0, toolbar_height as i32)),
                size: tauri::Size::Physical(PhysicalSize::new(size.width, content_height)),
            }
        } else {
            continue;
        };
        webview.set_bounds(bounds)?;
    }
    Ok(())
}

struct TauriEngine {
    tab: TabId,
    webview: Webview,
    senders: SenderMap,
}

impl EngineView for TauriEngine {
    fn navigate(&mut self, url: &Url) -> Result<()> {
        self.webview.navigate(url.clone()).map_err(engine_err)
    }

    fn back(&mut self) -> Result<()> {
        self.webview.eval("window.history.back()").map_err(engine_err)
    }

    fn forward(&mut self) -> Result<()> {
        self.webview.eval("window.history.forward()").map_err(engine_err)
    }

    fn reload(&mut self) -> Result<()> {
        self.webview.eval("window.location.reload()").map_err(engine_err)
    }

    fn run_script(&mut self, script: &str) -> Result<()> {
        self.webview.eval(script).map_err(engine_err)
    }

    fn set_active(&mut self, active: bool) -> Result<()> {
        if active {
            self.webview.show().map_err(engine_err)?;
            self.webview.set_focus().map_err(engine_err)
        } else {
            self.webview.hide().map_err(engine_err)
        }
    }

    fn close(&mut self) -> Result<()> {
        if let Ok(mut senders) = self.senders.lock() {
            senders.remove(&self.tab);
        }
        self.webview.close().map_err(engine_err)
    }
}

struct TauriEngineFactory {
    app: AppHandle,
    window: Window,
    policy: Arc<dyn NavigationPolicyProvider>,
    senders: SenderMap,
    full_screen: Arc<AtomicBool>,
}

impl EngineFactory for TauriEngineFactory {
    fn create(&mut self, tab: TabId, url: &Url, events: ViewEventSender) -> Result<Box<dyn EngineView>> {
        let label = tab.webview_label();
        let create_err = |e: tauri::Error| ShellError::EngineCreate {
            tab,
            reason: e.to_string(),
        };

        let policy = self.policy.clone();
        let app = self.app.clone();
        let load_events = events.clone();
        let builder = WebviewBuilder::new(&label, WebviewUrl::External(url.clone()))
            .initialization_script(TAB_INIT_SCRIPT)
            .on_navigation(move |url: &Url| {
                let allowed = policy.allow_navigation(url);
                if !allowed {
                    log::info!("[Engine] Navigation to {} blocked", url);
                }
                allowed
            })
            .on_page_load(move |_webview, payload| {
                log::debug!("[Engine] {:?} {}", payload.event(), payload.url());
                // Started and Finished both report; redirects show up on Finished.
                if load_events.url_changed(payload.url().clone()) {
                    schedule_pump(&app);
                }
            });

        let webview = self
            .window
            .add_child(builder, LogicalPosition::new(0.0, TOOLBAR_HEIGHT_LOGICAL), LogicalSize::new(100.0, 100.0))
            .map_err(create_err)?;
        layout(&self.window, self.full_screen.load(Ordering::SeqCst)).map_err(create_err)?;

        if let Ok(mut senders) = self.senders.lock() {
            senders.insert(tab, events);
        }
        log::info!("[Engine] Created webview {}", label);

        Ok(Box::new(TauriEngine {
            tab,
            webview,
            senders: self.senders.clone(),
        }))
    }
}

struct TauriWindow {
    app: AppHandle,
    window: Window,
    full_screen: Arc<AtomicBool>,
}

impl TauriWindow {
    fn emit_to_toolbar<S: serde::Serialize + Clone>(&self, event: &str, payload: S) -> Result<()> {
        self.app.emit_to(TOOLBAR_LABEL, event, payload).map_err(engine_err)
    }
}

impl ShellWindow for TauriWindow {
    fn set_full_screen(&mut self, full_screen: bool) -> Result<()> {
        self.full_screen.store(full_screen, Ordering::SeqCst);
        self.window.set_fullscreen(full_screen).map_err(engine_err)?;
        if let Some(toolbar) = self.window.webviews().into_iter().find(|w| w.label() == TOOLBAR_LABEL) {
            let shown = if full_screen { toolbar.hide() } else { toolbar.show() };
            shown.map_err(engine_err)?;
        }
        layout(&self.window, full_screen).map_err(engine_err)
    }

    fn apply_style(&mut self, style: &NavBarStyle) -> Result<()> {
        self.emit_to_toolbar("apply-theme", json!({ "theme": style.theme, "css": style.to_css() }))
    }

    fn set_url_text(&mut self, text: &str) -> Result<()> {
        self.emit_to_toolbar("update-url-bar", text.to_string())
    }

    fn update_tabs(&mut self, payload: &TabStripPayload) -> Result<()> {
        self.emit_to_toolbar("update-tabs", payload.clone())
    }

    fn show_settings(&mut self, dialog: &SettingsDialog) -> Result<()> {
        self.app
            .dialog()
            .message(dialog.message)
            .title(dialog.title)
            .show(|_| {});
        Ok(())
    }

    fn show_signup(&mut self, _dialog: &SignupDialog) -> Result<()> {
        // Reopening focuses the existing window instead of stacking another.
        if let Some(win) = self.app.get_webview_window(SIGNUP_LABEL) {
            return win.set_focus().map_err(engine_err);
        }

        tauri::WebviewWindowBuilder::new(&self.app, SIGNUP_LABEL, WebviewUrl::App("signup.html".into()))
            .title(SignupDialog::TITLE)
            .inner_size(400.0, 300.0)
            .resizable(false)
            .minimizable(false)
            .maximizable(false)
            .center()
            .focused(true)
            .build()
            .map(|_| ())
            .map_err(engine_err)
    }
}

#[tauri::command]
fn nav_command(webview: Webview, state: State<AppState>, command: NavCommand) -> std::result::Result<(), String> {
    authorize(webview.label(), ShellCommand::Nav).map_err(|e| e.to_string())?;
    with_shell(&state, |shell| shell.dispatch(command))
}

#[tauri::command]
fn toolbar_ready(webview: Webview, state: State<AppState>) -> std::result::Result<(), String> {
    authorize(webview.label(), ShellCommand::ToolbarReady).map_err(|e| e.to_string())?;
    with_shell(&state, MainShell::render_all)
}

#[tauri::command]
fn fullscreen_requested(webview: Webview, state: State<AppState>, enter: bool) -> std::result::Result<(), String> {
    let tab = authorize_tab(webview.label(), ShellCommand::FullScreenRequested).map_err(|e| e.to_string())?;
    let direction = if enter {
        FullScreenDirection::Enter
    } else {
        FullScreenDirection::Exit
    };

    let sender = state
        .senders
        .lock()
        .map_err(|e| e.to_string())?
        .get(&tab)
        .cloned();
    if let Some(sender) = sender {
        sender.emit(ViewEvent::FullScreenRequested(FullScreenRequest::new(direction, move || {
            log::debug!("[Main] Full screen {:?} acknowledged for {}", direction, tab);
        })));
    }

    with_shell(&state, |_| ())
}

#[tauri::command]
fn show_context_menu(app: AppHandle, webview: Webview, state: State<AppState>) -> std::result::Result<(), String> {
    let tab = authorize_tab(webview.label(), ShellCommand::ContextMenu).map_err(|e| e.to_string())?;

    let inspect = MenuItemBuilder::with_id(INSPECT_MENU_ID, "Inspect")
        .build(&app)
        .map_err(|e| e.to_string())?;
    let menu = MenuBuilder::new(&app).item(&inspect).build().map_err(|e| e.to_string())?;

    *state.menu_target.lock().map_err(|e| e.to_string())? = Some(tab);
    webview.window().popup_menu(&menu).map_err(|e| e.to_string())
}

#[tauri::command]
fn submit_signup(
    app: AppHandle,
    webview: Webview,
    state: State<AppState>,
    username: String,
    password: String,
) -> std::result::Result<(), String> {
    authorize(webview.label(), ShellCommand::SubmitSignup).map_err(|e| e.to_string())?;
    with_shell(&state, |shell| {
        shell.submit_signup(SignupDialog::with_credentials(username, password));
    })?;
    if let Some(win) = app.get_webview_window(SIGNUP_LABEL) {
        win.close().map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn main() {
    let log_level = if cfg!(debug_assertions) {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    };

    tauri::Builder::default()
        .plugin(tauri_plugin_log::Builder::default().level(log_level).build())
        .plugin(tauri_plugin_dialog::init())
        .setup(move |app| {
            let handle = app.handle().clone();
            let settings = Settings::load_from(&app.path().app_config_dir()?.join("settings.json"));

            let main_window = WindowBuilder::new(app, "main")
                .title(&settings.window.title)
                .inner_size(settings.window.width, settings.window.height)
                .position(settings.window.x, settings.window.y)
                .build()?;

            main_window.add_child(
                WebviewBuilder::new(TOOLBAR_LABEL, WebviewUrl::App("index.html".into())),
                LogicalPosition::new(0.0, 0.0),
                LogicalSize::new(settings.window.width, TOOLBAR_HEIGHT_LOGICAL),
            )?;

            let senders: SenderMap = Arc::new(Mutex::new(HashMap::new()));
            let full_screen = Arc::new(AtomicBool::new(false));
            let factory = TauriEngineFactory {
                app: handle.clone(),
                window: main_window.clone(),
                policy: Arc::new(AllowAllNavigation),
                senders: senders.clone(),
                full_screen: full_screen.clone(),
            };
            let window = TauriWindow {
                app: handle.clone(),
                window: main_window.clone(),
                full_screen: full_screen.clone(),
            };

            let shell = MainShell::new(settings, Box::new(factory), Box::new(window))?;
            app.manage(AppState {
                shell: Mutex::new(shell),
                senders,
                menu_target: Mutex::new(None),
            });

            app.on_menu_event(move |app_handle, event| {
                let Some(command) = NavCommand::from_menu_id(event.id().0.as_str()) else {
                    return;
                };
                let Some(state) = app_handle.try_state::<AppState>() else {
                    return;
                };
                let target = state.menu_target.lock().ok().and_then(|mut t| t.take());
                let Some(tab) = target else {
                    return;
                };
                if let Err(e) = with_shell(&state, |shell| shell.dispatch_for(tab, command)) {
                    log::error!("[Main] Menu command failed: {}", e);
                }
            });

            // Handle Window Resizing
            let window_for_resize = main_window.clone();
            main_window.on_window_event(move |event| {
                if let tauri::WindowEvent::Resized(_) = event {
                    if let Err(e) = layout(&window_for_resize, full_screen.load(Ordering::SeqCst)) {
                        log::warn!("[Main] Relayout failed: {}", e);
                    }
                }
            });

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            nav_command,
            toolbar_ready,
            fullscreen_requested,
            show_context_menu,
            submit_signup
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
