// Week and course deletion

use tauri::{AppHandle, State};
use tracing::info;

use super::common::{LibraryState, emitChanged};
use crate::dialogs::NativeConfirm;
use crate::library::DeleteOutcome;

fn logOutcome(fnName: &str, outcome: &DeleteOutcome) {
    match outcome {
        DeleteOutcome::Cancelled => info!("[{}] Cancelled by user", fnName),
        DeleteOutcome::Completed(report) => info!(
            "[{}] Deleted {} file(s), {} failed",
            fnName,
            report.deletedPaths.len(),
            report.failedPaths.len()
        ),
    }
}

#[derive(serde::Deserialize)]
pub struct DeleteWeekInput {
    pub courseName: String,
    pub week: String,
}

#[tauri::command]
pub fn deleteWeek(app: AppHandle, state: State<'_, LibraryState>, input: DeleteWeekInput) -> Result<DeleteOutcome, String> {
    info!("[deleteWeek] {} / {}", input.courseName, input.week);
    let mut library = state.library.lock();
    let outcome = library
        .deleteWeek(&input.courseName, &input.week, &NativeConfirm, &state.files)
        .map_err(|e| e.to_string())?;
    logOutcome("deleteWeek", &outcome);
    emitChanged(&app, library.revision());
    Ok(outcome)
}

#[tauri::command]
pub fn deleteCourse(app: AppHandle, state: State<'_, LibraryState>, courseName: String) -> Result<DeleteOutcome, String> {
    info!("[deleteCourse] {}", courseName);
    let mut library = state.library.lock();
    let outcome = library
        .deleteCourse(&courseName, &NativeConfirm, &state.files)
        .map_err(|e| e.to_string())?;
    logOutcome("deleteCourse", &outcome);
    emitChanged(&app, library.revision());
    Ok(outcome)
}
