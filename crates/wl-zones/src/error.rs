//! Zone-table validation errors.

use thiserror::Error;

/// Errors produced when building a zone table or road network.
#[derive(Debug, Error)]
pub enum ZoneError {
    #[error("zone rule {index} has an empty name")]
    EmptyName { index: usize },

    #[error("zone {name:?} has an invalid region: {reason}")]
    InvalidRegion { name: String, reason: String },

    #[error("road line {index} is invalid: {reason}")]
    InvalidRoad { index: usize, reason: String },

    #[error("world extent must be positive and finite, got {0}")]
    InvalidExtent(f64),

    #[error("road threshold must be positive and finite, got {0}")]
    InvalidThreshold(f64),
}

pub type ZoneResult<T> = Result<T, ZoneError>;
