use thiserror::Error;

use hl_core::BlockPos;
use hl_spatial::SpatialError;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("task configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error("path to {0} was dropped before arrival")]
    PathLost(BlockPos),

    #[error("still travelling to {site} after {ticks} ticks")]
    TravelTimeout { site: BlockPos, ticks: u64 },
}

pub type TaskResult<T> = Result<T, TaskError>;
