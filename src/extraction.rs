// External exercise extractor
// Invoked as: <extractor> --pdf_path <pdf> --output_dir <dir> --keywords <a,b,c>
// On success it prints a comma-separated list of the images it wrote

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{error, info};

use crate::error::{AppError, AppResult};
use crate::storage::extractionDir;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRequest {
    pub pdfPath: String,
    pub courseName: String,
    pub weekNumber: String,
}

#[derive(Debug, Clone)]
pub struct Extractor {
    executable: PathBuf,
    dataDir: PathBuf,
}

impl Extractor {
    pub fn new(executable: PathBuf, dataDir: PathBuf) -> Self {
        Self { executable, dataDir }
    }

    /// EXERCISE_BINDER_EXTRACTOR if set, else the bundled binary in the resource directory
    pub fn locate(resourceDir: Option<&Path>, dataDir: &Path) -> Self {
        let executable = std::env::var_os("EXERCISE_BINDER_EXTRACTOR")
            .map(PathBuf::from)
            .or_else(|| resourceDir.map(|dir| dir.join(executableName())))
            .unwrap_or_else(|| PathBuf::from(executableName()));
        info!("[Extractor::locate] Using extractor at {:?}", executable);
        Self::new(executable, dataDir.to_path_buf())
    }

    pub fn outputDir(&self, request: &ExtractionRequest) -> PathBuf {
        extractionDir(&self.dataDir, &request.courseName, &request.weekNumber)
    }

    /// Run the extractor and return the image paths it produced, in order
    pub async fn run(&self, request: &ExtractionRequest, keywords: &str) -> AppResult<Vec<String>> {
        let outputDir = self.outputDir(request);
        tokio::fs::create_dir_all(&outputDir)
            .await
            .map_err(|e| AppError::fileOperation(&outputDir.to_string_lossy(), e))?;

        info!("[Extractor::run] {} -> {:?}", request.pdfPath, outputDir);

        let output = Command::new(&self.executable)
            .arg("--pdf_path")
            .arg(&request.pdfPath)
            .arg("--output_dir")
            .arg(&outputDir)
            .arg("--keywords")
            .arg(keywords)
            .output()
            .await
            .map_err(|e| {
                error!("[Extractor::run] Could not start {:?}: {}", self.executable, e);
                AppError::ExtractorLaunch(e.to_string())
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let code = output.status.code().unwrap_or(-1);
            error!("[Extractor::run] Exited with {}: {}", code, stderr);
            return Err(AppError::ExternalTool { code, stderr });
        }

        let paths = parseOutput(&String::from_utf8_lossy(&output.stdout));
        info!("[Extractor::run] Extracted {} exercises", paths.len());
        Ok(paths)
    }
}

fn executableName() -> &'static str {
    if cfg!(windows) { "extractor.exe" } else { "extractor" }
}

/// Comma-separated paths; empty output means no exercises
pub fn parseOutput(stdout: &str) -> Vec<String> {
    stdout
        .trim()
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}
