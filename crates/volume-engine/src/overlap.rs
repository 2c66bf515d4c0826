//! Integration region for a pair of grids.

use earthwork_common::{Extent, GridData};
use tracing::debug;

use crate::error::{Result, VolumeError};

/// Region both grids cover, cut into `grid_size` cells from its minimum corner.
///
/// The minimum corner is the larger of the two grids' minima, so cells line up
/// with grid1's bins only when the grids share a lattice or the snapped
/// boundary bounds set that corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlap {
    pub extent: Extent,
    pub rows: usize,
    pub cols: usize,
    pub grid_size: f64,
}

impl Overlap {
    /// Intersect the two grid extents and, when given, the boundary bounds.
    ///
    /// Boundary bounds are snapped outward to grid1's cell lattice so cells
    /// stay aligned with the source bins.
    pub fn compute(grid1: &GridData, grid2: &GridData, boundary: Option<Extent>) -> Result<Self> {
        let gs = grid1.grid_size;
        let mut extent = grid1
            .extent()
            .intersection(&grid2.extent())
            .ok_or(VolumeError::NoOverlap)?;

        if let Some(bounds) = boundary {
            let snapped = snap_to_lattice(bounds, grid1.min_x, grid1.min_y, gs);
            extent = extent.intersection(&snapped).ok_or(VolumeError::NoOverlap)?;
        }

        if !extent.is_proper() {
            return Err(VolumeError::NoOverlap);
        }

        let (rows, cols) = extent.dimensions(gs);
        if rows == 0 || cols == 0 {
            return Err(VolumeError::NoOverlap);
        }
        debug!(rows, cols, "Computed overlap");

        Ok(Self {
            extent,
            rows,
            cols,
            grid_size: gs,
        })
    }

    pub fn cells(&self) -> usize {
        self.rows * self.cols
    }

    /// Lower-left corner of cell `(row, col)`.
    #[inline]
    pub fn cell_origin(&self, row: usize, col: usize) -> (f64, f64) {
        (
            self.extent.min_x + col as f64 * self.grid_size,
            self.extent.min_y + row as f64 * self.grid_size,
        )
    }
}

fn snap_to_lattice(bounds: Extent, origin_x: f64, origin_y: f64, gs: f64) -> Extent {
    let down = |v: f64, o: f64| o + ((v - o) / gs).floor() * gs;
    let up = |v: f64, o: f64| o + ((v - o) / gs).ceil() * gs;
    Extent::new(
        down(bounds.min_x, origin_x),
        down(bounds.min_y, origin_y),
        up(bounds.max_x, origin_x),
        up(bounds.max_y, origin_y),
    )
}
