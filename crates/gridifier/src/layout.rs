//! Grid dimension planning and the cell ceiling.

use earthwork_common::Extent;
use tracing::debug;

use crate::error::{RasterError, Result};

/// Extent and dimensions of a grid that is safe to allocate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub extent: Extent,
    pub rows: usize,
    pub cols: usize,
    pub grid_size: f64,
}

impl GridLayout {
    /// Pad the scanned extent by one cell on every side and size the grid.
    ///
    /// Fails with [`RasterError::GridTooLarge`] before anything is allocated
    /// when `rows * cols` would exceed `max_cells`.
    pub fn plan(scanned: Extent, grid_size: f64, max_cells: usize) -> Result<Self> {
        let extent = scanned.expand(grid_size);

        let cells = extent.cell_count(grid_size);
        if !cells.is_finite() || cells > max_cells as f64 {
            return Err(RasterError::GridTooLarge {
                rows: (extent.height() / grid_size).ceil() as u64,
                cols: (extent.width() / grid_size).ceil() as u64,
                cells,
                max_cells,
            });
        }

        let (rows, cols) = extent.dimensions(grid_size);
        debug!(rows, cols, cells = rows * cols, "Planned grid layout");

        Ok(Self {
            extent,
            rows,
            cols,
            grid_size,
        })
    }

    pub fn cells(&self) -> usize {
        self.rows * self.cols
    }

    /// Flat index of the cell containing local `(x, y)`, by floor.
    #[inline]
    pub fn cell_index(&self, x: f64, y: f64) -> Option<usize> {
        let col = ((x - self.extent.min_x) / self.grid_size).floor();
        let row = ((y - self.extent.min_y) / self.grid_size).floor();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_adds_margin() {
        let layout = GridLayout::plan(Extent::new(0.0, 0.0, 10.0, 4.0), 1.0, 1000).unwrap();
        assert_eq!(layout.extent, Extent::new(-1.0, -1.0, 11.0, 5.0));
        assert_eq!((layout.rows, layout.cols), (6, 12));
        assert_eq!(layout.cells(), 72);
        assert_eq!(layout.cells() as f64, layout.extent.cell_count(1.0));
    }

    #[test]
    fn test_plan_ceiling_is_inclusive() {
        // 10x10 scan plus margin is 12x12 = 144 cells
        let scanned = Extent::new(0.0, 0.0, 10.0, 10.0);
        assert!(GridLayout::plan(scanned, 1.0, 144).is_ok());
        match GridLayout::plan(scanned, 1.0, 143).unwrap_err() {
            RasterError::GridTooLarge { rows, cols, cells, .. } => {
                assert_eq!((rows, cols), (12, 12));
                assert_eq!(cells, 144.0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_plan_single_point_extent() {
        let layout = GridLayout::plan(Extent::new(3.0, 3.0, 3.0, 3.0), 0.5, 100).unwrap();
        assert_eq!((layout.rows, layout.cols), (2, 2));
        assert_eq!(layout.cell_index(3.0, 3.0), Some(3));
    }

    #[test]
    fn test_plan_rejects_oversized_grid() {
        let err = GridLayout::plan(Extent::new(0.0, 0.0, 10_000.0, 10_000.0), 0.01, 10_000_000)
            .unwrap_err();
        match err {
            RasterError::GridTooLarge { max_cells, cells, .. } => {
                assert_eq!(max_cells, 10_000_000);
                assert!(cells > 1e12);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_cell_index_bounds() {
        let layout = GridLayout::plan(Extent::new(0.0, 0.0, 2.0, 2.0), 1.0, 100).unwrap();
        assert_eq!(layout.cell_index(-1.0, -1.0), Some(0));
        assert_eq!(layout.cell_index(-1.5, 0.0), None);
        assert_eq!(layout.cell_index(3.0, 0.0), None);
    }
}
