// Import commands - pick a PDF and run the extractor on it

use tauri::{AppHandle, State};
use tracing::{error, info};

use super::common::{LibraryState, emitChanged};
use crate::dialogs;
use crate::library::ImportOutcome;

#[tauri::command]
pub fn pickPdf() -> Option<String> {
    info!("[pickPdf] Called");
    let result = dialogs::pickPdf();
    info!("[pickPdf] Result: {:?}", result);
    result
}

#[derive(serde::Deserialize)]
pub struct ImportInput {
    pub pdfPath: String,
    pub courseName: String,
    pub weekNumber: String,
}

/// The library stays usable while the extractor runs; only a second import is refused.
#[tauri::command]
pub async fn importPdf(app: AppHandle, state: State<'_, LibraryState>, input: ImportInput) -> Result<ImportOutcome, String> {
    info!("[importPdf] {} -> {} week {}", input.pdfPath, input.courseName, input.weekNumber);

    let (request, keywords) = {
        let mut library = state.library.lock();
        let request = library
            .beginImport(&input.pdfPath, &input.courseName, &input.weekNumber)
            .map_err(|e| e.to_string())?;
        emitChanged(&app, library.revision());
        (request, library.settings().keywords.clone())
    };

    let extracted = state.extractor.run(&request, &keywords).await;

    let mut library = state.library.lock();
    library.endImport();
    let result = match extracted {
        Ok(paths) => {
            let outcome = library.ingestExtraction(&request.courseName, &request.weekNumber, &paths);
            info!("[importPdf] {:?}", outcome);
            Ok(outcome)
        }
        Err(e) => {
            error!("[importPdf] Extraction failed: {}", e);
            Err(e.to_string())
        }
    };
    emitChanged(&app, library.revision());
    result
}
