//! Error types for volume computation.

use thiserror::Error;

/// Errors that end a volume computation. No partial result is produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VolumeError {
    #[error("grid not rasterized: {0}")]
    NotRasterized(String),

    #[error("grids and boundary share no overlapping area")]
    NoOverlap,

    #[error("grid sizes differ: {grid1} vs {grid2}")]
    GridSizeMismatch { grid1: f64, grid2: f64 },

    /// The grids were built in different frames; reanchor one first.
    #[error("grids use different frames (rotation {rotation1} vs {rotation2}, anchor offset {offset_x}, {offset_y})")]
    FrameMismatch {
        rotation1: f64,
        rotation2: f64,
        offset_x: f64,
        offset_y: f64,
    },

    #[error("invalid boundary: {0}")]
    InvalidBoundary(String),
}

/// Result type for volume computation.
pub type Result<T> = std::result::Result<T, VolumeError>;
