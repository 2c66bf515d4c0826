//! Planar polygon primitives used by boundary weighting.
//!
//! Polygons are plain vertex lists `&[(f64, f64)]`, implicitly closed
//! (the last vertex connects back to the first).

/// A planar polygon as an ordered vertex list.
pub type Polygon = Vec<(f64, f64)>;

/// Ray-casting parity test.
///
/// Points exactly on an edge give a deterministic answer that depends on
/// edge direction; callers should not rely on either outcome.
pub fn is_point_in_polygon(x: f64, y: f64, polygon: &[(f64, f64)]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = polygon[i];
        let (xj, yj) = polygon[j];
        // Straddle test first so yi == yj never reaches the division.
        if (yi > y) != (yj > y) {
            let intersect_x = (xj - xi) * (y - yi) / (yj - yi) + xi;
            if x < intersect_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Absolute polygon area via the shoelace formula. Any winding.
pub fn polygon_area(poly: &[(f64, f64)]) -> f64 {
    signed_area(poly).abs()
}

/// Signed shoelace area: positive for counter-clockwise winding.
pub fn signed_area(poly: &[(f64, f64)]) -> f64 {
    let n = poly.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for i in 0..n {
        let (x1, y1) = poly[i];
        let (x2, y2) = poly[(i + 1) % n];
        twice += x1 * y2 - x2 * y1;
    }
    twice / 2.0
}

/// Whether the polygon winds counter-clockwise.
pub fn is_counter_clockwise(poly: &[(f64, f64)]) -> bool {
    signed_area(poly) > 0.0
}

/// Convexity test: every turn has the same sign and the turns add up to one
/// full revolution.
///
/// The revolution check rejects self-intersecting rings such as a pentagram,
/// whose turns agree in sign but wind twice. Collinear and repeated vertices
/// are tolerated. Fewer than three distinct vertices is not convex.
pub fn is_convex(poly: &[(f64, f64)]) -> bool {
    let same = |p: (f64, f64), q: (f64, f64)| {
        (p.0 - q.0).abs() < 1e-12 && (p.1 - q.1).abs() < 1e-12
    };
    let mut ring: Vec<(f64, f64)> = Vec::with_capacity(poly.len());
    for &p in poly {
        if ring.last().map_or(true, |&q| !same(p, q)) {
            ring.push(p);
        }
    }
    while ring.len() > 1 && same(ring[0], ring[ring.len() - 1]) {
        ring.pop();
    }

    let poly = ring.as_slice();
    let n = poly.len();
    if n < 3 {
        return false;
    }

    let mut sign = 0.0f64;
    let mut turning = 0.0f64;
    for i in 0..n {
        let (ax, ay) = poly[i];
        let (bx, by) = poly[(i + 1) % n];
        let (cx, cy) = poly[(i + 2) % n];
        let (ux, uy) = (bx - ax, by - ay);
        let (vx, vy) = (cx - bx, cy - by);
        let cross = ux * vy - uy * vx;
        if cross.abs() < 1e-12 {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
        turning += cross.atan2(ux * vx + uy * vy);
    }
    sign != 0.0 && (turning.abs() - std::f64::consts::TAU).abs() < 1e-6
}

/// Left-of-halfplane test: `(end - start) x (p - start) >= 0`.
#[inline]
fn is_inside(p: (f64, f64), start: (f64, f64), end: (f64, f64)) -> bool {
    (end.0 - start.0) * (p.1 - start.1) - (end.1 - start.1) * (p.0 - start.0) >= 0.0
}

/// Intersection of the infinite lines through `segment` and `clip_edge`.
///
/// Uses homogeneous coordinates: each line is the cross product of its two
/// points, and the intersection is the cross product of the two lines.
/// Must not be called on parallel lines; `clip_polygon` only calls it for
/// segments that cross the clip edge.
pub fn get_intersection(
    segment: ((f64, f64), (f64, f64)),
    clip_edge: ((f64, f64), (f64, f64)),
) -> (f64, f64) {
    let ((x1, y1), (x2, y2)) = segment;
    let ((x3, y3), (x4, y4)) = clip_edge;

    let l1 = (y1 - y2, x2 - x1, x1 * y2 - x2 * y1);
    let l2 = (y3 - y4, x4 - x3, x3 * y4 - x4 * y3);

    let px = l1.1 * l2.2 - l1.2 * l2.1;
    let py = l1.2 * l2.0 - l1.0 * l2.2;
    let w = l1.0 * l2.1 - l1.1 * l2.0;

    (px / w, py / w)
}

/// Sutherland-Hodgman clipping of `subject` against `clip`.
///
/// Precondition: `clip` is convex and wound counter-clockwise. A clockwise
/// clip polygon treats its interior as outside and yields an empty result;
/// orientation is not corrected here. The subject may be any simple polygon.
pub fn clip_polygon(subject: &[(f64, f64)], clip: &[(f64, f64)]) -> Polygon {
    if subject.len() < 3 || clip.len() < 3 {
        return Vec::new();
    }

    let mut output: Polygon = subject.to_vec();

    for i in 0..clip.len() {
        if output.is_empty() {
            break;
        }
        let start = clip[i];
        let end = clip[(i + 1) % clip.len()];

        let input = std::mem::take(&mut output);
        let mut prev = input[input.len() - 1];
        for &current in &input {
            let current_in = is_inside(current, start, end);
            let prev_in = is_inside(prev, start, end);

            if current_in {
                if !prev_in {
                    output.push(get_intersection((prev, current), (start, end)));
                }
                output.push(current);
            } else if prev_in {
                output.push(get_intersection((prev, current), (start, end)));
            }
            prev = current;
        }
    }

    if output.len() < 3 {
        output.clear();
    }
    output
}

/// Axis-aligned bounds `(min_x, min_y, max_x, max_y)` of a polygon.
pub fn polygon_bounds(poly: &[(f64, f64)]) -> Option<(f64, f64, f64, f64)> {
    if poly.is_empty() {
        return None;
    }
    let mut bounds = (
        f64::INFINITY,
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::NEG_INFINITY,
    );
    for &(x, y) in poly {
        bounds.0 = bounds.0.min(x);
        bounds.1 = bounds.1.min(y);
        bounds.2 = bounds.2.max(x);
        bounds.3 = bounds.3.max(y);
    }
    Some(bounds)
}

/// Square cell `[x0, x0+size] x [y0, y0+size]` as a CCW polygon.
pub fn cell_square(x0: f64, y0: f64, size: f64) -> [(f64, f64); 4] {
    [
        (x0, y0),
        (x0 + size, y0),
        (x0 + size, y0 + size),
        (x0, y0 + size),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Polygon {
        vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]
    }

    #[test]
    fn test_signed_area_orientation() {
        let mut sq = unit_square();
        assert!((signed_area(&sq) - 1.0).abs() < 1e-12);
        sq.reverse();
        assert!((signed_area(&sq) + 1.0).abs() < 1e-12);
        assert!(!is_counter_clockwise(&sq));
    }

    #[test]
    fn test_intersection_of_crossing_lines() {
        let p = get_intersection(((0.0, 0.0), (2.0, 2.0)), ((0.0, 2.0), (2.0, 0.0)));
        assert!((p.0 - 1.0).abs() < 1e-12);
        assert!((p.1 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_is_convex() {
        assert!(is_convex(&unit_square()));
        let l_shape = vec![
            (0.0, 0.0),
            (2.0, 0.0),
            (2.0, 1.0),
            (1.0, 1.0),
            (1.0, 2.0),
            (0.0, 2.0),
        ];
        assert!(!is_convex(&l_shape));
        assert!(!is_convex(&[(0.0, 0.0), (1.0, 1.0)]));
    }

    /// Pentagram vertices: every second point of a regular pentagon.
    fn pentagram(radius: f64) -> Vec<(f64, f64)> {
        (0..5)
            .map(|k| {
                let a = std::f64::consts::FRAC_PI_2 + (k * 2) as f64 * std::f64::consts::TAU / 5.0;
                (radius * a.cos(), radius * a.sin())
            })
            .collect()
    }

    #[test]
    fn test_is_convex_rejects_self_intersecting_ring() {
        let star = pentagram(8.0);
        assert!(!is_convex(&star));
        let mut cw = star;
        cw.reverse();
        assert!(!is_convex(&cw));
    }

    #[test]
    fn test_is_convex_tolerates_repeats_and_winding() {
        let mut sq = unit_square();
        sq.insert(2, sq[1]);
        sq.push(sq[0]);
        assert!(is_convex(&sq));

        let mut cw = unit_square();
        cw.reverse();
        assert!(is_convex(&cw));
        assert!(!is_convex(&[(0.0, 0.0), (0.0, 0.0), (1.0, 1.0)]));
    }
}
