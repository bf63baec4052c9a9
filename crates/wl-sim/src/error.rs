use thiserror::Error;

use wl_brain::BrainError;
use wl_core::CoreError;
use wl_zones::ZoneError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Brain(#[from] BrainError),

    #[error(transparent)]
    Zones(#[from] ZoneError),
}

pub type SimResult<T> = Result<T, SimError>;
