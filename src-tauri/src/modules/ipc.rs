//! Caller checks for the commands exposed to webviews.
//!
//! Tab views run arbitrary remote pages, so they only get the commands their
//! injected script uses. The toolbar drives the shell; the signup window can
//! only submit itself.

use crate::error::{Result, ShellError};
use crate::state::TabId;

pub const TOOLBAR_LABEL: &str = "toolbar";
pub const SIGNUP_LABEL: &str = "signup";

/// The webview behind an invoke, by label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Caller {
    Toolbar,
    Signup,
    Tab(TabId),
    Unknown,
}

impl Caller {
    pub fn from_label(label: &str) -> Self {
        match label {
            TOOLBAR_LABEL => Caller::Toolbar,
            SIGNUP_LABEL => Caller::Signup,
            other => TabId::from_webview_label(other).map_or(Caller::Unknown, Caller::Tab),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShellCommand {
    Nav,
    ToolbarReady,
    SubmitSignup,
    FullScreenRequested,
    ContextMenu,
}

impl ShellCommand {
    pub fn name(self) -> &'static str {
        match self {
            ShellCommand::Nav => "nav_command",
            ShellCommand::ToolbarReady => "toolbar_ready",
            ShellCommand::SubmitSignup => "submit_signup",
            ShellCommand::FullScreenRequested => "fullscreen_requested",
            ShellCommand::ContextMenu => "show_context_menu",
        }
    }

    pub fn allows(self, caller: Caller) -> bool {
        matches!(
            (self, caller),
            (ShellCommand::Nav | ShellCommand::ToolbarReady, Caller::Toolbar)
                | (ShellCommand::SubmitSignup, Caller::Signup)
                | (ShellCommand::FullScreenRequested | ShellCommand::ContextMenu, Caller::Tab(_))
        )
    }
}

pub fn authorize(label: &str, command: ShellCommand) -> Result<Caller> {
    let caller = Caller::from_label(label);
    if command.allows(caller) {
        Ok(caller)
    } else {
        log::warn!("[Ipc] Rejected {} from {}", command.name(), label);
        Err(ShellError::Forbidden {
            command: command.name(),
            label: label.to_string(),
        })
    }
}

/// Like [`authorize`] for commands only tab views may send.
pub fn authorize_tab(label: &str, command: ShellCommand) -> Result<TabId> {
    match authorize(label, command)? {
        Caller::Tab(tab) => Ok(tab),
        _ => Err(ShellError::Forbidden {
            command: command.name(),
            label: label.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_caller_from_label() {
        assert_eq!(Caller::from_label("toolbar"), Caller::Toolbar);
        assert_eq!(Caller::from_label("signup"), Caller::Signup);
        assert_eq!(Caller::from_label("tab-3"), Caller::Tab(TabId(3)));
        assert_eq!(Caller::from_label("main"), Caller::Unknown);
        assert_eq!(Caller::from_label("tab-"), Caller::Unknown);
    }

    #[rstest]
    #[case("toolbar", ShellCommand::Nav, true)]
    #[case("toolbar", ShellCommand::ToolbarReady, true)]
    #[case("toolbar", ShellCommand::SubmitSignup, false)]
    #[case("signup", ShellCommand::SubmitSignup, true)]
    #[case("signup", ShellCommand::Nav, false)]
    #[case("tab-1", ShellCommand::Nav, false)]
    #[case("tab-1", ShellCommand::ToolbarReady, false)]
    #[case("tab-1", ShellCommand::SubmitSignup, false)]
    #[case("tab-1", ShellCommand::FullScreenRequested, true)]
    #[case("tab-1", ShellCommand::ContextMenu, true)]
    #[case("toolbar", ShellCommand::FullScreenRequested, false)]
    #[case("main", ShellCommand::Nav, false)]
    fn test_authorize(#[case] label: &str, #[case] command: ShellCommand, #[case] allowed: bool) {
        assert_eq!(authorize(label, command).is_ok(), allowed);
    }

    #[test]
    fn test_rejection_names_caller_and_command() {
        let err = authorize("tab-7", ShellCommand::Nav).unwrap_err();
        assert_eq!(err.to_string(), "tab-7 may not call nav_command");
    }

    #[test]
    fn test_authorize_tab_returns_tab() {
        assert_eq!(authorize_tab("tab-9", ShellCommand::ContextMenu).unwrap(), TabId(9));
        assert!(authorize_tab("toolbar", ShellCommand::ContextMenu).is_err());
    }
}
