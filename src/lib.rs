// Allow non-snake_case names for JSON serialization compatibility with TypeScript frontend
#![allow(non_snake_case)]

pub mod catalog;
pub mod dialogs;
pub mod error;
pub mod extraction;
pub mod files;
pub mod library;
pub mod models;
pub mod storage;

#[cfg(feature = "desktop")]
mod commands;

use tracing_subscriber::EnvFilter;

/// Log to stderr. RUST_LOG overrides the default level.
pub fn initLogging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("exercise_binder_lib=info"));
    // a subscriber may already be installed (tests, embedding)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use std::sync::Arc;
    use tauri::Manager;

    use crate::commands::common::AppState;
    use crate::extraction::Extractor;
    use crate::library::Library;

    initLogging();

    tauri::Builder::default()
        .setup(|app| {
            let dataDir = storage::appDataDir();
            tracing::info!("[run] Data directory: {:?}", dataDir);

            let kv = storage::JsonFileStore::open(storage::configPath(&dataDir))?;
            let library = Library::load(Box::new(kv));
            let resourceDir = app.path().resource_dir().ok();
            let extractor = Extractor::locate(resourceDir.as_deref(), &dataDir);

            app.manage(Arc::new(AppState::new(library, extractor)));
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Library view
            commands::library::loadLibrary,
            commands::library::getTree,
            commands::library::search,
            commands::library::setSort,
            commands::library::toggleExpanded,
            commands::library::selectExercise,
            commands::library::clearSelection,
            // Exercise
            commands::exercise::addTag,
            commands::exercise::removeTag,
            commands::exercise::renameExercise,
            commands::exercise::deleteExercise,
            // Week / course
            commands::course::deleteWeek,
            commands::course::deleteCourse,
            // Import
            commands::import::pickPdf,
            commands::import::importPdf,
            // Settings
            commands::settings::getSettings,
            commands::settings::saveSettings,
            commands::settings::addKeyword,
            commands::settings::removeKeyword,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
