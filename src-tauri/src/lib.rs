// Monsearch Browser Library Entry Point
// This file exposes all modules so they can be imported by main.rs
// and tested independently.

pub mod error;
pub mod settings;

// Shared state
pub mod state;

// Pure logic modules (no Tauri imports)
pub mod modules;

pub use error::{Result, ShellError};
