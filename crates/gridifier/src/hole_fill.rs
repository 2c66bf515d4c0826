//! Small-hole repair by neighbourhood averaging.

use earthwork_common::{is_valid_height, NO_DATA};

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

/// Fill interior `NO_DATA` cells with the mean of their valid 8-neighbours.
///
/// A cell is filled only when at least `min_neighbors` neighbours are valid.
/// Each pass reads a snapshot of the previous pass, so a fill never feeds
/// another fill within the same pass. Border rows and columns are left alone.
/// Stops early once a pass fills nothing. Returns the number of cells filled.
pub fn fill_holes(
    heights: &mut [f32],
    rows: usize,
    cols: usize,
    min_neighbors: usize,
    passes: usize,
) -> usize {
    if rows < 3 || cols < 3 || heights.len() != rows * cols {
        return 0;
    }

    let mut total = 0;
    for _ in 0..passes {
        let snapshot = heights.to_vec();
        let mut filled = 0;

        for row in 1..rows - 1 {
            for col in 1..cols - 1 {
                let idx = row * cols + col;
                if snapshot[idx] != NO_DATA {
                    continue;
                }

                let mut sum = 0.0f64;
                let mut count = 0usize;
                for (dr, dc) in NEIGHBORS {
                    let r = (row as isize + dr) as usize;
                    let c = (col as isize + dc) as usize;
                    let h = snapshot[r * cols + c];
                    if is_valid_height(h) {
                        sum += h as f64;
                        count += 1;
                    }
                }

                if count >= min_neighbors {
                    heights[idx] = (sum / count as f64) as f32;
                    filled += 1;
                }
            }
        }

        total += filled;
        if filled == 0 {
            break;
        }
    }
    total
}
