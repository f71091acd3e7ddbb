//! Spatial-subsystem error type.

use thiserror::Error;

use hl_core::{BlockPos, SiteId, WorldPos};

/// Errors produced by `hl-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no path from {from} to {to}")]
    NoPath { from: WorldPos, to: BlockPos },

    #[error("site {0} not found in index")]
    SiteNotFound(SiteId),

    #[error("invalid search radius: horizontal {horizontal}, vertical {vertical} (both must be > 0)")]
    InvalidRadius { horizontal: i32, vertical: i32 },
}

pub type SpatialResult<T> = Result<T, SpatialError>;
