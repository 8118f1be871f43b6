// Error taxonomy for Exercise Binder
// User cancellation is not an error; operations report it as an outcome instead

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Extractor ran but exited with a non-zero status
    #[error("Extraction failed with code {code}: {stderr}")]
    ExternalTool { code: i32, stderr: String },

    /// Extractor executable could not be started at all
    #[error("Failed to start extractor: {0}")]
    ExtractorLaunch(String),

    #[error("{path}: {message}")]
    FileOperation { path: String, message: String },

    /// Missing field, empty tag or keyword, conflicting request
    #[error("{0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to save data: {0}")]
    Persistence(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn fileOperation(path: &str, err: impl std::fmt::Display) -> Self {
        Self::FileOperation {
            path: path.to_string(),
            message: err.to_string(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_tool_message_carries_diagnostics() {
        let err = AppError::ExternalTool { code: 2, stderr: "no such file".to_string() };
        assert_eq!(err.to_string(), "Extraction failed with code 2: no such file");
    }

    #[test]
    fn test_file_operation_message() {
        let err = AppError::fileOperation("/a/exercise_1.png", "permission denied");
        assert_eq!(err.to_string(), "/a/exercise_1.png: permission denied");
    }
}
