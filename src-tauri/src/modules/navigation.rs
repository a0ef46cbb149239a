// Pure navigation logic - no Tauri imports allowed.
// This module turns URL bar text into a navigable URL and can be unit tested.

use url::Url;

use crate::error::{Result, ShellError};

/// Schemes accepted as typed. Anything else gets the default scheme prepended,
/// so "localhost:3000" is not read as scheme "localhost".
const RECOGNIZED_SCHEMES: &[&str] = &["http", "https", "file", "about", "data", "ftp", "view-source"];

/// Logic for resolving URL bar input.
///
/// Purely local string handling: no DNS, no reachability checks, no search
/// fallback. Text that still fails to parse after the scheme is added is
/// returned as an error for the caller to drop.
pub fn resolve_input(input: &str, default_scheme: &str) -> Result<Url> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ShellError::EmptyInput);
    }

    let candidate = if has_recognized_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("{}://{}", default_scheme, trimmed)
    };

    Url::parse(&candidate).map_err(|source| ShellError::InvalidUrl {
        input: trimmed.to_string(),
        source,
    })
}

fn has_recognized_scheme(input: &str) -> bool {
    match input.split_once(':') {
        Some((scheme, _)) => RECOGNIZED_SCHEMES.iter().any(|s| s.eq_ignore_ascii_case(scheme)),
        None => false,
    }
}
