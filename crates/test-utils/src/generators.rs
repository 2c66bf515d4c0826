//! Synthetic survey data.
//!
//! Vertex clouds are plain `[x, y, z]` triples in origin-relative units,
//! laid out on regular lattices so tests can predict which grid cell each
//! vertex lands in.

use earthwork_common::{Extent, GridData, GridFrame, NO_DATA};

/// Vertices on an `nx` by `ny` lattice starting at `(x0, y0)`.
///
/// Heights come from `height(x, y)`.
pub fn vertex_lattice<F>(
    x0: f64,
    y0: f64,
    nx: usize,
    ny: usize,
    spacing: f64,
    height: F,
) -> Vec<[f64; 3]>
where
    F: Fn(f64, f64) -> f64,
{
    let mut out = Vec::with_capacity(nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            let x = x0 + i as f64 * spacing;
            let y = y0 + j as f64 * spacing;
            out.push([x, y, height(x, y)]);
        }
    }
    out
}

/// Vertices at the centre of every cell of a `rows x cols` grid with
/// lower-left corner `(x0, y0)`, one per cell.
pub fn cell_center_vertices(
    x0: f64,
    y0: f64,
    rows: usize,
    cols: usize,
    grid_size: f64,
    z: f64,
) -> Vec<[f64; 3]> {
    vertex_lattice(x0 + grid_size / 2.0, y0 + grid_size / 2.0, cols, rows, grid_size, |_, _| z)
}

/// Render vertices as OBJ text, with a comment header, normals and a face
/// line mixed in as real exports have.
pub fn obj_text(vertices: &[[f64; 3]]) -> String {
    let mut out = String::from("# synthetic survey tile\nmtllib tile.mtl\n");
    for v in vertices {
        out.push_str(&format!("v {} {} {}\n", v[0], v[1], v[2]));
    }
    out.push_str("vn 0 0 1\nvt 0.5 0.5\n");
    if vertices.len() >= 3 {
        out.push_str("f 1/1/1 2/1/1 3/1/1\n");
    }
    out
}

/// Grid with every cell set to `value`, extent starting at the origin.
pub fn constant_grid(rows: usize, cols: usize, grid_size: f64, value: f32) -> GridData {
    grid_from_heights(rows, cols, grid_size, vec![value; rows * cols])
}

/// Grid over `[0, cols*gs] x [0, rows*gs]` in the default frame.
pub fn grid_from_heights(rows: usize, cols: usize, grid_size: f64, heights: Vec<f32>) -> GridData {
    grid_in_frame(rows, cols, grid_size, heights, 0.0, 0.0, GridFrame::default())
}

/// Grid with lower-left corner `(min_x, min_y)` in `frame`.
pub fn grid_in_frame(
    rows: usize,
    cols: usize,
    grid_size: f64,
    heights: Vec<f32>,
    min_x: f64,
    min_y: f64,
    frame: GridFrame,
) -> GridData {
    let extent = Extent::new(
        min_x,
        min_y,
        min_x + cols as f64 * grid_size,
        min_y + rows as f64 * grid_size,
    );
    GridData::from_parts(extent, grid_size, rows, cols, heights, frame)
        .expect("test grid shape must match")
}

/// Copy of `grid` with every valid cell raised by `delta`.
pub fn raised(grid: &GridData, delta: f32) -> GridData {
    let mut out = grid.clone();
    for h in out.heights.iter_mut() {
        if *h != NO_DATA {
            *h += delta;
        }
    }
    out
}

/// Heights sloping along x: `base + slope * col`.
pub fn ramp_heights(rows: usize, cols: usize, base: f32, slope: f32) -> Vec<f32> {
    let mut data = Vec::with_capacity(rows * cols);
    for _row in 0..rows {
        for col in 0..cols {
            data.push(base + slope * col as f32);
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_lattice_layout() {
        let v = vertex_lattice(1.0, 2.0, 3, 2, 0.5, |x, y| x + y);
        assert_eq!(v.len(), 6);
        assert_eq!(v[0], [1.0, 2.0, 3.0]);
        assert_eq!(v[4], [1.5, 2.5, 4.0]);
    }

    #[test]
    fn test_obj_text_contains_vertices() {
        let text = obj_text(&[[1.0, 2.0, 3.0]]);
        assert!(text.contains("v 1 2 3\n"));
        assert!(text.starts_with('#'));
    }

    #[test]
    fn test_constant_grid_shape() {
        let g = constant_grid(3, 4, 2.0, 1.5);
        assert_eq!(g.heights.len(), 12);
        assert_eq!(g.max_x, 8.0);
        assert_eq!(g.max_y, 6.0);
    }
}
