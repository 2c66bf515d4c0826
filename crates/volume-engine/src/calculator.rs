//! Grid-difference integration.

use std::time::Instant;

use earthwork_common::{BoundaryPoint, GridData, HeightDiffGrid, VolumeResult, FRAME_TOLERANCE};
use metrics::{counter, histogram};
use tracing::{debug, info, instrument, warn};

use crate::config::VolumeConfig;
use crate::error::{Result, VolumeError};
use crate::overlap::Overlap;
use crate::sampling::sample_height;
use crate::weighting::{BoundaryWeighting, LocalBoundary, DEFAULT_SUPERSAMPLE};

/// Cells whose effective area is below this fraction of a full cell are skipped.
const MIN_AREA_FRACTION: f64 = 1e-9;

/// Computes cut, fill and net volume between two epochs.
///
/// Synchronous and allocation-bounded by the overlap size. Hosts with an
/// async runtime should call it from a blocking task.
#[derive(Debug, Clone, Default)]
pub struct VolumeCalculator {
    config: VolumeConfig,
}

impl VolumeCalculator {
    pub fn new(config: VolumeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VolumeConfig {
        &self.config
    }

    /// Integrate `grid2 - grid1` over their overlap, optionally clipped to
    /// `boundary` (global coordinates).
    ///
    /// Both grids must share a frame; see [`GridData::reanchored`].
    #[instrument(skip_all, fields(
        grid_size = grid1.grid_size,
        boundary_vertices = boundary.map(|b| b.len()).unwrap_or(0),
        weighting = %self.config.weighting,
    ))]
    pub fn compute(
        &self,
        grid1: &GridData,
        grid2: &GridData,
        boundary: Option<&[BoundaryPoint]>,
    ) -> Result<VolumeResult> {
        check_inputs(grid1, grid2)?;
        let started = Instant::now();

        let local = boundary
            .map(|b| LocalBoundary::new(b, &grid1.frame))
            .transpose()?;
        let weighting = match &local {
            Some(b) if self.config.weighting == BoundaryWeighting::ExactClip && !b.is_convex() => {
                warn!(
                    vertices = b.polygon().len(),
                    "Boundary is not convex, using supersampled coverage"
                );
                BoundaryWeighting::Supersample {
                    n: DEFAULT_SUPERSAMPLE,
                }
            }
            _ => self.config.weighting,
        };

        let overlap = Overlap::compute(grid1, grid2, local.as_ref().map(|b| b.bounds()))?;
        let gs = overlap.grid_size;
        let full_area = gs * gs;
        let min_area = MIN_AREA_FRACTION * full_area;
        let noise = self.config.noise_threshold;

        let mut diff_map = HeightDiffGrid::zeros(overlap.extent, overlap.rows, overlap.cols);
        let mut cut = 0.0f64;
        let mut fill = 0.0f64;
        let mut area = 0.0f64;
        let mut integrated = 0usize;
        let mut unresolved = 0usize;

        for row in 0..overlap.rows {
            for col in 0..overlap.cols {
                let (x0, y0) = overlap.cell_origin(row, col);
                let effective = match &local {
                    Some(b) => b.cell_area(weighting, x0, y0, gs),
                    None => full_area,
                };
                if effective < min_area {
                    continue;
                }

                let (cx, cy) = (x0 + gs / 2.0, y0 + gs / 2.0);
                let heights = (sample_height(grid1, cx, cy), sample_height(grid2, cx, cy));
                let (Some(h1), Some(h2)) = heights else {
                    unresolved += 1;
                    continue;
                };

                let diff = h2 as f64 - h1 as f64;
                diff_map.data[row * overlap.cols + col] = diff as f32;
                area += effective;
                integrated += 1;

                if diff.abs() < noise {
                    continue;
                }
                if diff > 0.0 {
                    fill += diff * effective;
                } else {
                    cut += -diff * effective;
                }
            }
        }

        let elapsed = started.elapsed();
        counter!("volume_cells_integrated_total").increment(integrated as u64);
        histogram!("volume_compute_duration_seconds").record(elapsed.as_secs_f64());
        debug!(unresolved, cells = overlap.cells(), "Integration loop finished");
        info!(
            cut,
            fill,
            net = fill - cut,
            area,
            integrated,
            elapsed_ms = elapsed.as_millis() as u64,
            "Volume computed"
        );

        Ok(VolumeResult {
            cut_volume: cut,
            fill_volume: fill,
            net_volume: fill - cut,
            area,
            grid_size: gs,
            cells_integrated: integrated,
            diff_map,
        })
    }
}

fn check_inputs(grid1: &GridData, grid2: &GridData) -> Result<()> {
    for (name, grid) in [("grid1", grid1), ("grid2", grid2)] {
        if !grid.is_populated() {
            return Err(VolumeError::NotRasterized(format!(
                "{} has {} heights for {}x{} cells",
                name,
                grid.heights.len(),
                grid.rows,
                grid.cols
            )));
        }
    }

    if (grid1.grid_size - grid2.grid_size).abs() > 1e-9 {
        return Err(VolumeError::GridSizeMismatch {
            grid1: grid1.grid_size,
            grid2: grid2.grid_size,
        });
    }

    if !grid1.frame.is_compatible(&grid2.frame) {
        let (offset_x, offset_y) = grid2.frame.translation_to(&grid1.frame);
        return Err(VolumeError::FrameMismatch {
            rotation1: grid1.frame.rotation,
            rotation2: grid2.frame.rotation,
            offset_x: if offset_x.abs() < FRAME_TOLERANCE { 0.0 } else { offset_x },
            offset_y: if offset_y.abs() < FRAME_TOLERANCE { 0.0 } else { offset_y },
        });
    }

    Ok(())
}

/// Compute volumes with the default configuration.
pub fn compute_volume(
    grid1: &GridData,
    grid2: &GridData,
    boundary: Option<&[BoundaryPoint]>,
) -> Result<VolumeResult> {
    VolumeCalculator::default().compute(grid1, grid2, boundary)
}
