//! Tests for grid data and frames.

use earthwork_common::{Extent, GridData, GridFrame, Point3D, NO_DATA};

#[test]
fn test_empty_grid_is_all_no_data() {
    let grid = GridData::empty(Extent::new(0.0, 0.0, 10.0, 5.0), 2.0, GridFrame::default())
        .unwrap();
    assert_eq!(grid.rows, 3);
    assert_eq!(grid.cols, 5);
    assert_eq!(grid.heights.len(), grid.rows * grid.cols);
    assert!(grid.heights.iter().all(|h| *h == NO_DATA));
    assert_eq!(grid.valid_count(), 0);
    assert_eq!(grid.get(0, 0), None);
}

#[test]
fn test_get_skips_sentinel() {
    let mut grid =
        GridData::empty(Extent::new(0.0, 0.0, 2.0, 2.0), 1.0, GridFrame::default()).unwrap();
    let idx = grid.index(1, 0);
    grid.heights[idx] = 12.5;
    assert_eq!(grid.get(1, 0), Some(12.5));
    assert_eq!(grid.get(0, 1), None);
    assert_eq!(grid.get(5, 5), None);
}

#[test]
fn test_grid_json_roundtrip_keeps_frame() {
    let frame = GridFrame {
        anchor: Point3D::new(500_000.0, 3_400_000.0, 12.0),
        rotation: 0.25,
    };
    let mut grid = GridData::empty(Extent::new(-1.0, -1.0, 1.0, 1.0), 0.5, frame).unwrap();
    grid.heights[3] = 7.25;

    let json = serde_json::to_string(&grid).unwrap();
    let back: GridData = serde_json::from_str(&json).unwrap();
    assert_eq!(back, grid);
    assert_eq!(back.frame.rotation, 0.25);
}

#[test]
fn test_frames_compatible_only_when_equal() {
    let a = GridFrame::unrotated(Point3D::new(1.0, 2.0, 3.0));
    let b = GridFrame::unrotated(Point3D::new(1.0, 2.0, 99.0));
    let c = GridFrame::unrotated(Point3D::new(1.5, 2.0, 3.0));
    assert!(a.is_compatible(&b));
    assert!(!a.is_compatible(&c));
}
