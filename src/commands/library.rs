// Library view commands: snapshot, search, sort, expansion and selection

use tauri::{AppHandle, State};
use tracing::{info, warn};

use super::common::{LibraryState, emitChanged};
use crate::catalog::{ExerciseDisplay, RenderTree};
use crate::library::LibrarySnapshot;
use crate::models::{ContainerKey, SortKey};

#[tauri::command]
pub fn loadLibrary(state: State<'_, LibraryState>) -> LibrarySnapshot {
    info!("[loadLibrary] Called");
    let snapshot = state.library.lock().snapshot();
    info!("[loadLibrary] {} courses, revision {}", snapshot.tree.courses.len(), snapshot.revision);
    snapshot
}

#[tauri::command]
pub fn getTree(state: State<'_, LibraryState>) -> RenderTree {
    state.library.lock().renderTree()
}

#[tauri::command]
pub fn search(app: AppHandle, state: State<'_, LibraryState>, term: String) -> LibrarySnapshot {
    info!("[search] term: '{}'", term);
    let mut library = state.library.lock();
    library.search(&term);
    emitChanged(&app, library.revision());
    library.snapshot()
}

#[tauri::command]
pub fn setSort(app: AppHandle, state: State<'_, LibraryState>, sortKey: String) -> RenderTree {
    let key = SortKey::fromStr(&sortKey).unwrap_or_else(|| {
        warn!("[setSort] Unknown sort key '{}', using default order", sortKey);
        SortKey::Default
    });
    info!("[setSort] {:?}", key);

    let mut library = state.library.lock();
    library.setSort(key);
    emitChanged(&app, library.revision());
    library.renderTree()
}

#[derive(serde::Deserialize)]
pub struct ToggleExpandedInput {
    pub course: String,
    pub week: Option<String>,
    pub expanded: bool,
}

#[tauri::command]
pub fn toggleExpanded(state: State<'_, LibraryState>, input: ToggleExpandedInput) {
    let key = match &input.week {
        Some(week) => ContainerKey::week(&input.course, week),
        None => ContainerKey::course(&input.course),
    };
    state.library.lock().setExpanded(key, input.expanded);
}

#[tauri::command]
pub fn selectExercise(app: AppHandle, state: State<'_, LibraryState>, path: String) -> Result<ExerciseDisplay, String> {
    info!("[selectExercise] {}", path);
    let mut library = state.library.lock();
    let display = library.select(&path).map_err(|e| e.to_string())?;
    emitChanged(&app, library.revision());
    Ok(display)
}

#[tauri::command]
pub fn clearSelection(app: AppHandle, state: State<'_, LibraryState>) {
    let mut library = state.library.lock();
    library.clearSelection();
    emitChanged(&app, library.revision());
}
