//! Shared test utilities for the earthwork workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Synthetic vertex clouds and OBJ text
//! - Ready-made height grids
//! - Site fixtures (origins, boundaries, metadata documents)
//! - Temporary site directories
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod files;
pub mod fixtures;
pub mod generators;

pub use files::*;
pub use fixtures::*;
pub use generators::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Approximate equality of two `(x, y)` pairs, component by component.
///
/// Either side may be any expression yielding a tuple, such as the result of
/// a frame transform.
#[macro_export]
macro_rules! assert_coords_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let (left_x, left_y) = $left;
        let (right_x, right_y) = $right;
        $crate::assert_approx_eq!(left_x, right_x, $epsilon);
        $crate::assert_approx_eq!(left_y, right_y, $epsilon);
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_assert_approx_eq_passes() {
        assert_approx_eq!(1.0001, 1.0, 0.001);
        assert_approx_eq!(-5.5, -5.500001, 0.0001);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq!(1.1, 1.0, 0.001);
    }

    #[test]
    fn test_assert_coords_approx_eq_passes() {
        assert_coords_approx_eq!((1.0001, 2.0001), (1.0, 2.0), 0.001);
        let pair = || (3.0, -4.0);
        assert_coords_approx_eq!(pair(), (3.0000001, -4.0), 1e-6);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_coords_approx_eq_checks_y() {
        assert_coords_approx_eq!((1.0, 2.0), (1.0, 2.5), 0.001);
    }
}
