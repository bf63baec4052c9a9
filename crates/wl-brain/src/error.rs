use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrainError {
    #[error("location catalog needs at least 2 entries, got {0}")]
    CatalogTooSmall(usize),

    #[error("location {index} ({name:?}) is invalid: {reason}")]
    InvalidLocation {
        index:  usize,
        name:   String,
        reason: String,
    },

    #[error("motion configuration error: {0}")]
    Motion(String),

    #[error("catalog parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type BrainResult<T> = Result<T, BrainError>;
