//! Cut/fill analysis output.

use serde::{Deserialize, Serialize};

use crate::grid::HeightDiffGrid;

/// Outcome of one two-epoch comparison.
///
/// Fill is material added (later epoch higher), cut is the magnitude of
/// material removed. Both in cubic grid units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeResult {
    pub cut_volume: f64,
    pub fill_volume: f64,
    /// `fill_volume - cut_volume`
    pub net_volume: f64,
    /// Planar area actually integrated.
    pub area: f64,
    pub grid_size: f64,
    /// Cells that contributed to `area`.
    pub cells_integrated: usize,
    pub diff_map: HeightDiffGrid,
}

impl VolumeResult {
    /// Mean height change over the integrated area.
    pub fn mean_change(&self) -> f64 {
        if self.area > 0.0 {
            self.net_volume / self.area
        } else {
            0.0
        }
    }
}
