// Settings commands - extraction keywords

use tauri::State;
use tracing::info;

use super::common::LibraryState;
use crate::models::Settings;

#[derive(serde::Serialize)]
pub struct SettingsInfo {
    pub keywords: String,
    pub keywordList: Vec<String>,
}

impl From<&Settings> for SettingsInfo {
    fn from(s: &Settings) -> Self {
        Self {
            keywords: s.keywords.clone(),
            keywordList: s.keywordList(),
        }
    }
}

#[tauri::command]
pub fn getSettings(state: State<'_, LibraryState>) -> SettingsInfo {
    info!("[getSettings] Called");
    let library = state.library.lock();
    library.settings().into()
}

#[derive(serde::Deserialize)]
pub struct SaveSettingsInput {
    pub keywords: String,
}

#[tauri::command]
pub fn saveSettings(state: State<'_, LibraryState>, input: SaveSettingsInput) -> Result<SettingsInfo, String> {
    info!("[saveSettings] keywords: {}", input.keywords);
    let mut library = state.library.lock();
    let settings = library.saveSettings(&input.keywords).map_err(|e| e.to_string())?;
    Ok(settings.into())
}

#[tauri::command]
pub fn addKeyword(state: State<'_, LibraryState>, keyword: String) -> Result<SettingsInfo, String> {
    info!("[addKeyword] {}", keyword);
    let mut library = state.library.lock();
    if !library.addKeyword(&keyword).map_err(|e| e.to_string())? {
        info!("[addKeyword] Already present");
    }
    Ok(library.settings().into())
}

#[tauri::command]
pub fn removeKeyword(state: State<'_, LibraryState>, keyword: String) -> Result<SettingsInfo, String> {
    info!("[removeKeyword] {}", keyword);
    let mut library = state.library.lock();
    library.removeKeyword(&keyword).map_err(|e| e.to_string())?;
    Ok(library.settings().into())
}
