// File system operations on extracted exercise images

use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, error};

use crate::error::{AppError, AppResult};

/// Outcome of a best-effort multi-file delete
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchDelete {
    pub deletedPaths: Vec<String>,
    pub failedPaths: Vec<String>,
}

pub trait FileOps {
    fn rename(&self, oldPath: &str, newPath: &str) -> AppResult<()>;

    fn delete(&self, path: &str) -> AppResult<()>;

    /// Attempt every path independently, collecting failures
    fn deleteAll(&self, paths: &[String]) -> BatchDelete {
        let mut result = BatchDelete::default();
        for path in paths {
            match self.delete(path) {
                Ok(()) => result.deletedPaths.push(path.clone()),
                Err(e) => {
                    error!("[deleteAll] Failed to delete {}: {}", path, e);
                    result.failedPaths.push(path.clone());
                }
            }
        }
        result
    }

    /// Remove a directory only if nothing is left in it. Returns true if removed.
    fn removeDirIfEmpty(&self, dir: &Path) -> bool;
}

/// Operates on the local disk
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileOps;

impl FileOps for LocalFileOps {
    fn rename(&self, oldPath: &str, newPath: &str) -> AppResult<()> {
        if Path::new(newPath).exists() {
            return Err(AppError::fileOperation(newPath, "a file with that name already exists"));
        }
        fs::rename(oldPath, newPath).map_err(|e| {
            error!("[rename] {} -> {}: {}", oldPath, newPath, e);
            AppError::fileOperation(oldPath, e)
        })
    }

    fn delete(&self, path: &str) -> AppResult<()> {
        fs::remove_file(path).map_err(|e| AppError::fileOperation(path, e))
    }

    fn removeDirIfEmpty(&self, dir: &Path) -> bool {
        let isEmpty = fs::read_dir(dir)
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(false);
        if !isEmpty {
            return false;
        }
        match fs::remove_dir(dir) {
            Ok(()) => {
                debug!("[removeDirIfEmpty] Removed {:?}", dir);
                true
            }
            Err(e) => {
                debug!("[removeDirIfEmpty] Could not remove {:?}: {}", dir, e);
                false
            }
        }
    }
}
