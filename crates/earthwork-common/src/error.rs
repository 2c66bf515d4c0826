//! Error types for grid construction and frame conversion.

use thiserror::Error;

/// Result type alias using GridError.
pub type GridResult<T> = Result<T, GridError>;

/// Errors raised when assembling or converting grids.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("height array has {len} values, expected {rows}x{cols}")]
    ShapeMismatch { rows: usize, cols: usize, len: usize },

    #[error("grid size must be positive and finite, got {0}")]
    InvalidGridSize(f64),

    #[error("cannot reanchor across rotations ({from} rad -> {to} rad)")]
    RotationMismatch { from: f64, to: f64 },
}
