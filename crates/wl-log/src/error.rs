//! Error types for wl-log.

use thiserror::Error;

/// Errors that can occur when writing or reading perception logs.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed log line: {0}")]
    Parse(String),
}

/// Alias for `Result<T, LogError>`.
pub type LogResult<T> = Result<T, LogError>;
