use thiserror::Error;

use hl_core::CoreError;
use hl_spatial::SpatialError;
use hl_task::TaskError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{what} length {got} does not match agent count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("task setup failed: {0}")]
    Task(#[from] TaskError),

    #[error("spatial error: {0}")]
    Spatial(#[from] SpatialError),

    #[error("scenario parse error: {0}")]
    Scenario(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
}

pub type SimResult<T> = Result<T, SimError>;
