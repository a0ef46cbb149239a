// Module exports for pure logic
pub mod engine;     // Engine collaborator seams
pub mod events;     // Per-tab event streams
pub mod view;       // BrowserView + history mirror
pub mod tabs;       // Tab registry
pub mod navigation; // URL bar input
pub mod navbar;     // Toolbar commands and styling
pub mod dialogs;
pub mod shell;
pub mod ipc;        // Which webview may call what

#[cfg(test)]
pub(crate) mod test_support;
