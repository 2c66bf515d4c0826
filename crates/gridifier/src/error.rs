//! Error types for rasterization.

use thiserror::Error;

/// Errors that end a rasterization call. Nothing is returned half-built.
#[derive(Error, Debug)]
pub enum RasterError {
    /// The extent scan saw no usable vertex in any source.
    #[error("no valid vertices found in {sources} source(s)")]
    NoData { sources: usize },

    /// The planned grid exceeds the cell ceiling; use a larger grid size.
    #[error("grid of {rows}x{cols} ({cells} cells) exceeds the limit of {max_cells} cells")]
    GridTooLarge {
        rows: u64,
        cols: u64,
        cells: f64,
        max_cells: usize,
    },

    #[error("grid size must be positive and finite, got {0}")]
    InvalidGridSize(f64),

    #[error("no vertex sources supplied")]
    NoSources,

    #[error("failed to read vertex source '{source_name}': {source}")]
    Io {
        source_name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid grid: {0}")]
    Grid(#[from] earthwork_common::GridError),
}

impl RasterError {
    pub fn io(source_name: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            source_name: source_name.into(),
            source,
        }
    }
}

/// Result type for rasterization.
pub type Result<T> = std::result::Result<T, RasterError>;
