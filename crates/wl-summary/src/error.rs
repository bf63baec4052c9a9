//! Error types for wl-summary.

use thiserror::Error;

use wl_log::LogError;

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error(transparent)]
    Log(#[from] LogError),

    #[error("invalid summary configuration: {0}")]
    Config(String),
}

pub type SummaryResult<T> = Result<T, SummaryError>;
