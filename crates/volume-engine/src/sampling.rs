//! Height lookup with a one-cell fallback.

use earthwork_common::GridData;

const NEIGHBORS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Height of `grid` at local `(x, y)`.
///
/// Uses the floor-indexed bin when it holds a sample; otherwise the valid
/// 8-neighbour whose centre is nearest to `(x, y)`, ties going to the first
/// in row-major order. `None` when nothing in the 3x3 block is valid.
pub fn sample_height(grid: &GridData, x: f64, y: f64) -> Option<f32> {
    let gs = grid.grid_size;
    let col = ((x - grid.min_x) / gs).floor();
    let row = ((y - grid.min_y) / gs).floor();
    if !col.is_finite() || !row.is_finite() {
        return None;
    }
    let (row, col) = (row as isize, col as isize);

    if let Some(h) = cell(grid, row, col) {
        return Some(h);
    }

    let mut best: Option<(f64, f32)> = None;
    for (dr, dc) in NEIGHBORS {
        let (r, c) = (row + dr, col + dc);
        let Some(h) = cell(grid, r, c) else {
            continue;
        };
        let cx = grid.min_x + (c as f64 + 0.5) * gs;
        let cy = grid.min_y + (r as f64 + 0.5) * gs;
        let d2 = (cx - x).powi(2) + (cy - y).powi(2);
        if best.map_or(true, |(bd, _)| d2 < bd) {
            best = Some((d2, h));
        }
    }
    best.map(|(_, h)| h)
}

#[inline]
fn cell(grid: &GridData, row: isize, col: isize) -> Option<f32> {
    if row < 0 || col < 0 {
        return None;
    }
    grid.get(row as usize, col as usize)
}
