//! Regular height grids.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, GridResult};
use crate::frame::GridFrame;

/// Sentinel for "no sample in this cell".
pub const NO_DATA: f32 = -1_000_000.0;

/// True for any real sample (not the sentinel, not NaN/inf).
#[inline]
pub fn is_valid_height(h: f32) -> bool {
    h != NO_DATA && h.is_finite()
}

/// Axis-aligned rectangle in a grid frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Extent {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Inverted (empty) extent, ready for [`Extent::include`].
    pub fn empty() -> Self {
        Self::new(
            f64::INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::NEG_INFINITY,
        )
    }

    pub fn include(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// True when the extent has positive area.
    pub fn is_proper(&self) -> bool {
        self.max_x > self.min_x && self.max_y > self.min_y
    }

    /// Grow by `margin` on every side.
    pub fn expand(&self, margin: f64) -> Self {
        Self::new(
            self.min_x - margin,
            self.min_y - margin,
            self.max_x + margin,
            self.max_y + margin,
        )
    }

    /// Shift by a planar offset.
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(
            self.min_x + dx,
            self.min_y + dy,
            self.max_x + dx,
            self.max_y + dy,
        )
    }

    /// Intersection; `None` when empty or degenerate.
    pub fn intersection(&self, other: &Extent) -> Option<Extent> {
        let out = Extent::new(
            self.min_x.max(other.min_x),
            self.min_y.max(other.min_y),
            self.max_x.min(other.max_x),
            self.max_y.min(other.max_y),
        );
        out.is_proper().then_some(out)
    }

    /// `(rows, cols)` at the given cell size, each `ceil(span / grid_size)`.
    pub fn dimensions(&self, grid_size: f64) -> (usize, usize) {
        let rows = (self.height() / grid_size).ceil().max(0.0) as usize;
        let cols = (self.width() / grid_size).ceil().max(0.0) as usize;
        (rows, cols)
    }

    /// Cell count as f64, usable before any cast can overflow.
    pub fn cell_count(&self, grid_size: f64) -> f64 {
        (self.height() / grid_size).ceil() * (self.width() / grid_size).ceil()
    }
}

/// Dense height field, row-major, one `f32` per cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridData {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub rows: usize,
    pub cols: usize,
    pub grid_size: f64,
    pub heights: Vec<f32>,
    pub frame: GridFrame,
}

impl GridData {
    /// Assemble a grid, checking `heights.len() == rows * cols`.
    pub fn from_parts(
        extent: Extent,
        grid_size: f64,
        rows: usize,
        cols: usize,
        heights: Vec<f32>,
        frame: GridFrame,
    ) -> GridResult<Self> {
        if grid_size <= 0.0 || !grid_size.is_finite() {
            return Err(GridError::InvalidGridSize(grid_size));
        }
        let expected = rows
            .checked_mul(cols)
            .ok_or(GridError::ShapeMismatch {
                rows,
                cols,
                len: heights.len(),
            })?;
        if heights.len() != expected {
            return Err(GridError::ShapeMismatch {
                rows,
                cols,
                len: heights.len(),
            });
        }

        Ok(Self {
            min_x: extent.min_x,
            min_y: extent.min_y,
            max_x: extent.max_x,
            max_y: extent.max_y,
            rows,
            cols,
            grid_size,
            heights,
            frame,
        })
    }

    /// Grid over `extent` with every cell `NO_DATA`; dimensions from the extent.
    pub fn empty(extent: Extent, grid_size: f64, frame: GridFrame) -> GridResult<Self> {
        let (rows, cols) = extent.dimensions(grid_size);
        Self::from_parts(
            extent,
            grid_size,
            rows,
            cols,
            vec![NO_DATA; rows * cols],
            frame,
        )
    }

    pub fn extent(&self) -> Extent {
        Extent::new(self.min_x, self.min_y, self.max_x, self.max_y)
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Shape invariant holds and there is at least one cell.
    pub fn is_populated(&self) -> bool {
        !self.is_empty() && self.heights.len() == self.rows * self.cols
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Valid height at `(row, col)`, `None` when out of range or `NO_DATA`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        let h = self.heights[self.index(row, col)];
        is_valid_height(h).then_some(h)
    }

    /// Cell containing local `(x, y)` by floor indexing.
    #[inline]
    pub fn cell_of(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        let col = ((x - self.min_x) / self.grid_size).floor();
        let row = ((y - self.min_y) / self.grid_size).floor();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        (row < self.rows && col < self.cols).then_some((row, col))
    }

    /// Number of cells holding a real sample.
    pub fn valid_count(&self) -> usize {
        self.heights.iter().filter(|h| is_valid_height(**h)).count()
    }

    /// Re-express this grid in another frame with the same rotation.
    ///
    /// Heights are untouched; only the extent moves.
    pub fn reanchored(&self, target: &GridFrame) -> GridResult<GridData> {
        if !self.frame.same_rotation(target) {
            return Err(GridError::RotationMismatch {
                from: self.frame.rotation,
                to: target.rotation,
            });
        }
        let (dx, dy) = self.frame.translation_to(target);
        let extent = self.extent().translate(dx, dy);
        let mut out = self.clone();
        out.min_x = extent.min_x;
        out.min_y = extent.min_y;
        out.max_x = extent.max_x;
        out.max_y = extent.max_y;
        out.frame = *target;
        Ok(out)
    }
}

/// Signed per-cell height difference over an overlap region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeightDiffGrid {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<f32>,
}

impl HeightDiffGrid {
    /// Zero-filled map over `extent`.
    pub fn zeros(extent: Extent, rows: usize, cols: usize) -> Self {
        Self {
            min_x: extent.min_x,
            min_y: extent.min_y,
            max_x: extent.max_x,
            max_y: extent.max_y,
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col).copied()
    }

    /// Smallest and largest differences, ignoring zeros.
    pub fn range(&self) -> Option<(f32, f32)> {
        self.data
            .iter()
            .copied()
            .filter(|d| *d != 0.0)
            .fold(None, |acc, d| match acc {
                None => Some((d, d)),
                Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
            })
    }
}
