// Commands module - exports all command handlers
// Submodules must be public for Tauri's generate_handler! macro

pub mod common;
pub mod course;
pub mod exercise;
pub mod import;
pub mod library;
pub mod settings;
