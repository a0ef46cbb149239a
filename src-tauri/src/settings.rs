use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use url::Url;

pub const DEFAULT_HOME_URL: &str = "https://www.google.com";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Monsearch Web Browser".to_string(),
            x: 300.0,
            y: 150.0,
            width: 1200.0,
            height: 800.0,
        }
    }
}

/// Read-only launch configuration. Nothing here is written back at runtime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub homepage: String,
    /// Scheme prepended to URL bar input that names none.
    pub default_scheme: String,
    pub theme: Theme,
    pub window: WindowSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            homepage: DEFAULT_HOME_URL.to_string(),
            default_scheme: "http".to_string(),
            theme: Theme::default(),
            window: WindowSettings::default(),
        }
    }
}

impl Settings {
    pub fn home_url(&self) -> Url {
        match Url::parse(&self.homepage) {
            Ok(url) => url,
            Err(e) => {
                log::warn!("[Settings] Invalid homepage {:?}: {}, using default", self.homepage, e);
                default_home_url()
            }
        }
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!("[Settings] Failed to parse {}: {}, returning defaults", path.display(), e);
                Self::default()
            }),
            Err(e) => {
                log::warn!("[Settings] Failed to read {}: {}, returning defaults", path.display(), e);
                Self::default()
            }
        }
    }
}

fn default_home_url() -> Url {
    Url::parse(DEFAULT_HOME_URL).expect("default home URL is valid")
}
