// Exercise commands - tags, rename and delete of a single exercise

use tauri::{AppHandle, State};
use tracing::info;

use super::common::{LibraryState, emitChanged};
use crate::dialogs::NativeConfirm;
use crate::library::{DeleteOutcome, RenameOutcome};

#[derive(serde::Deserialize)]
pub struct TagInput {
    pub path: String,
    pub tag: String,
}

/// Returns the exercise's tags after the edit
#[tauri::command]
pub fn addTag(app: AppHandle, state: State<'_, LibraryState>, input: TagInput) -> Result<Vec<String>, String> {
    info!("[addTag] '{}' on {}", input.tag, input.path);
    let mut library = state.library.lock();
    let added = library.addTag(&input.path, &input.tag).map_err(|e| e.to_string())?;
    if added {
        emitChanged(&app, library.revision());
    } else {
        info!("[addTag] Already tagged");
    }
    Ok(currentTags(&library, &input.path))
}

#[tauri::command]
pub fn removeTag(app: AppHandle, state: State<'_, LibraryState>, input: TagInput) -> Result<Vec<String>, String> {
    info!("[removeTag] '{}' from {}", input.tag, input.path);
    let mut library = state.library.lock();
    if library.removeTag(&input.path, &input.tag).map_err(|e| e.to_string())? {
        emitChanged(&app, library.revision());
    }
    Ok(currentTags(&library, &input.path))
}

fn currentTags(library: &crate::library::Library, path: &str) -> Vec<String> {
    library
        .store()
        .findExercise(path)
        .map(|e| e.tags.clone())
        .unwrap_or_default()
}

#[derive(serde::Deserialize)]
pub struct RenameInput {
    pub path: String,
    pub newName: String,
}

#[tauri::command]
pub fn renameExercise(app: AppHandle, state: State<'_, LibraryState>, input: RenameInput) -> Result<RenameOutcome, String> {
    info!("[renameExercise] {} -> '{}'", input.path, input.newName);
    let mut library = state.library.lock();
    let outcome = library
        .renameExercise(&input.path, &input.newName, &state.files)
        .map_err(|e| e.to_string())?;
    if let RenameOutcome::Renamed { .. } = outcome {
        emitChanged(&app, library.revision());
    }
    Ok(outcome)
}

#[tauri::command]
pub fn deleteExercise(app: AppHandle, state: State<'_, LibraryState>, path: String) -> Result<DeleteOutcome, String> {
    info!("[deleteExercise] {}", path);
    let mut library = state.library.lock();
    let outcome = library
        .deleteExercise(&path, &NativeConfirm, &state.files)
        .map_err(|e| e.to_string())?;
    if let DeleteOutcome::Completed(_) = outcome {
        emitChanged(&app, library.revision());
    }
    Ok(outcome)
}
