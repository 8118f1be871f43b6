// Shared state and helpers for commands

use parking_lot::Mutex;
use std::sync::Arc;
use tauri::{AppHandle, Emitter};
use tracing::warn;

use crate::extraction::Extractor;
use crate::files::LocalFileOps;
use crate::library::Library;

/// Event sent to the frontend after every state transition. Payload: the new revision.
pub const LIBRARY_CHANGED: &str = "library-changed";

pub struct AppState {
    pub library: Mutex<Library>,
    pub extractor: Extractor,
    pub files: LocalFileOps,
}

impl AppState {
    pub fn new(library: Library, extractor: Extractor) -> Self {
        Self {
            library: Mutex::new(library),
            extractor,
            files: LocalFileOps,
        }
    }
}

pub type LibraryState = Arc<AppState>;

pub fn emitChanged(app: &AppHandle, revision: u64) {
    if let Err(e) = app.emit(LIBRARY_CHANGED, revision) {
        warn!("[emitChanged] Could not notify frontend: {}", e);
    }
}
