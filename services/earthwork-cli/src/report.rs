//! Result formatting.

use earthwork_common::VolumeResult;
use serde::Serialize;

/// Summary of one analysis, without the diff map.
#[derive(Debug, Clone, Serialize)]
pub struct VolumeReport {
    pub name: String,
    pub before: String,
    pub after: String,
    pub cut_volume: f64,
    pub fill_volume: f64,
    pub net_volume: f64,
    pub area: f64,
    pub mean_change: f64,
    pub grid_size: f64,
    pub cells_integrated: usize,
    pub weighting: String,
    pub diff_min: Option<f32>,
    pub diff_max: Option<f32>,
}

impl VolumeReport {
    pub fn new(
        name: &str,
        before: &str,
        after: &str,
        weighting: String,
        result: &VolumeResult,
    ) -> Self {
        let range = result.diff_map.range();
        Self {
            name: name.to_string(),
            before: before.to_string(),
            after: after.to_string(),
            cut_volume: result.cut_volume,
            fill_volume: result.fill_volume,
            net_volume: result.net_volume,
            area: result.area,
            mean_change: result.mean_change(),
            grid_size: result.grid_size,
            cells_integrated: result.cells_integrated,
            weighting,
            diff_min: range.map(|r| r.0),
            diff_max: range.map(|r| r.1),
        }
    }

    pub fn format_table(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Analysis: {} ({} -> {})\n", self.name, self.before, self.after));
        out.push_str(&format!("  Grid size:   {:.3} m ({})\n", self.grid_size, self.weighting));
        out.push_str(&format!("  Cells:       {}\n", self.cells_integrated));
        out.push_str(&format!("  Area:        {:.2} m²\n", self.area));
        out.push_str(&format!("  Cut:         {:.3} m³\n", self.cut_volume));
        out.push_str(&format!("  Fill:        {:.3} m³\n", self.fill_volume));
        out.push_str(&format!("  Net:         {:+.3} m³\n", self.net_volume));
        out.push_str(&format!("  Mean change: {:+.3} m\n", self.mean_change));
        if let (Some(lo), Some(hi)) = (self.diff_min, self.diff_max) {
            out.push_str(&format!("  Diff range:  {:+.3} .. {:+.3} m\n", lo, hi));
        }
        out
    }

    pub fn format_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
