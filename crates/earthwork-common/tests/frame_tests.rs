//! Grid frame transforms.

use earthwork_common::{get_intersection, GridFrame, Point3D, Rotation2D};
use test_utils::{assert_approx_eq, assert_coords_approx_eq, rotated_square_boundary};

const EPS: f64 = 1e-9;

#[test]
fn test_aligned_frame_squares_up_boundary() {
    let boundary = rotated_square_boundary(500.0, 200.0, 4.0, 0.6);
    let frame = GridFrame::aligned_to_boundary(&boundary, Point3D::ZERO);
    assert_approx_eq!(frame.rotation, 0.6, EPS);

    let expected = [(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)];
    for (p, (ex, ey)) in boundary.iter().zip(expected) {
        assert_coords_approx_eq!(frame.to_local(p.x, p.y), (ex, ey), EPS);
    }
}

#[test]
fn test_local_global_roundtrip() {
    let frame = GridFrame {
        anchor: Point3D::new(1000.0, -250.0, 3.0),
        rotation: -1.1,
    };
    for &(gx, gy) in &[(1000.0, -250.0), (1012.5, -240.25), (990.0, -300.0)] {
        let (lx, ly) = frame.to_local(gx, gy);
        assert_coords_approx_eq!(frame.to_global(lx, ly), (gx, gy), EPS);
    }
}

#[test]
fn test_local_transform_matches_to_local() {
    let frame = GridFrame {
        anchor: Point3D::new(10.0, 20.0, 0.0),
        rotation: 0.35,
    };
    let transform = frame.local_transform();
    let (gx, gy) = (17.0, 26.5);
    assert_coords_approx_eq!(transform.apply(gx, gy), frame.to_local(gx, gy), EPS);
}

#[test]
fn test_translation_between_anchors() {
    let a = GridFrame {
        anchor: Point3D::new(0.0, 0.0, 0.0),
        rotation: 0.4,
    };
    let b = GridFrame {
        anchor: Point3D::new(3.0, -2.0, 0.0),
        rotation: 0.4,
    };
    let (dx, dy) = a.translation_to(&b);
    let (gx, gy) = (5.0, 7.0);
    let (ax, ay) = a.to_local(gx, gy);
    assert_coords_approx_eq!((ax + dx, ay + dy), b.to_local(gx, gy), EPS);
}

#[test]
fn test_rotation_inverse() {
    let r = Rotation2D::new(0.9);
    let (x, y) = r.apply(2.0, -1.0);
    assert_coords_approx_eq!(r.inverse().apply(x, y), (2.0, -1.0), EPS);
}

#[test]
fn test_intersection_with_vertical_edge() {
    let p = get_intersection(((0.0, 0.5), (2.0, 1.5)), ((1.0, 0.0), (1.0, 2.0)));
    assert_coords_approx_eq!(p, (1.0, 1.0), 1e-12);
}
