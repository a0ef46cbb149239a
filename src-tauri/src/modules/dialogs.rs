// Settings and signup dialogs.
// Each open gets its own instance so nothing typed leaks into the next one.

use std::fmt;

use chrono::Utc;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SettingsDialog {
    pub title: &'static str,
    pub message: &'static str,
}

impl Default for SettingsDialog {
    fn default() -> Self {
        Self {
            title: "Settings",
            message: "Settings are under construction.",
        }
    }
}

#[derive(Default)]
pub struct SignupDialog {
    username: String,
    password: String,
}

impl SignupDialog {
    pub const TITLE: &'static str = "Sign Up";
    pub const PROMPT: &'static str = "Create your Mon account:";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = username.into();
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    /// Masked rendering of the password field.
    pub fn password_mask(&self) -> String {
        "\u{2022}".repeat(self.password.chars().count())
    }

    /// Closes the dialog. Nothing is stored or validated; the password is dropped.
    pub fn submit(self) -> SignupRecord {
        SignupRecord {
            username: self.username,
            submitted_at: Utc::now().to_rfc3339(),
        }
    }
}

impl fmt::Debug for SignupDialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupDialog")
            .field("username", &self.username)
            .field("password", &self.password_mask())
            .finish()
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRecord {
    pub username: String,
    /// RFC 3339, UTC.
    pub submitted_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_never_in_debug() {
        let dialog = SignupDialog::with_credentials("mon", "hunter2");
        let debug = format!("{:?}", dialog);
        assert!(debug.contains("mon"));
        assert!(!debug.contains("hunter2"));
        assert_eq!(dialog.password_mask().chars().count(), 7);
    }

    #[test]
    fn test_each_dialog_starts_empty() {
        let mut first = SignupDialog::new();
        first.set_username("alice");
        first.set_password("secret");
        let record = first.submit();
        assert_eq!(record.username, "alice");

        let second = SignupDialog::new();
        assert_eq!(second.username(), "");
        assert_eq!(second.password_mask(), "");
    }

    #[test]
    fn test_record_serializes_without_password() {
        let record = SignupDialog::with_credentials("bob", "pw").submit();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["username"], "bob");
        assert!(json.get("password").is_none());
        assert!(json["submittedAt"].is_string());
    }
}
