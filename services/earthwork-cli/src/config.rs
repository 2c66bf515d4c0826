//! Analysis file: two epochs, an optional boundary and engine settings.
//!
//! ```yaml
//! name: north-pit-2024q3
//! grid_size: 0.5
//! metadata: survey/metadata.xml
//! boundary: survey/boundary.csv
//! store_dir: .earthwork/grids
//! before:
//!   name: 2024-07
//!   inputs: [survey/2024-07]
//! after:
//!   name: 2024-09
//!   inputs: [survey/2024-09/tile_0.obj, survey/2024-09/tile_1.obj]
//! volume:
//!   weighting: exact
//!   noise_threshold: 0.02
//! ```
//!
//! Relative paths resolve against the directory holding the file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use gridifier::GridifierConfig;
use serde::{Deserialize, Serialize};
use volume_engine::VolumeConfig;

fn default_grid_size() -> f64 {
    0.5
}

fn default_store_dir() -> PathBuf {
    PathBuf::from(".earthwork/grids")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochConfig {
    pub name: String,

    /// OBJ files or directories searched recursively for them.
    pub inputs: Vec<PathBuf>,

    /// Per-epoch metadata when the epochs were processed separately.
    #[serde(default)]
    pub metadata: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub name: String,

    #[serde(default = "default_grid_size")]
    pub grid_size: f64,

    /// Shared `metadata.xml` holding the survey origin.
    #[serde(default)]
    pub metadata: Option<PathBuf>,

    #[serde(default)]
    pub boundary: Option<PathBuf>,

    #[serde(default = "default_store_dir")]
    pub store_dir: PathBuf,

    /// Re-rasterize even when a cached grid exists.
    #[serde(default)]
    pub refresh: bool,

    pub before: EpochConfig,
    pub after: EpochConfig,

    #[serde(default)]
    pub gridifier: GridifierConfig,

    #[serde(default)]
    pub volume: VolumeConfig,
}

impl AnalysisConfig {
    /// Load from YAML and resolve relative paths against the file's directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read analysis file: {}", path.display()))?;
        let mut config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse analysis file: {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.resolve_paths(base);
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let join = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };

        if let Some(p) = self.metadata.as_mut() {
            join(p);
        }
        if let Some(p) = self.boundary.as_mut() {
            join(p);
        }
        join(&mut self.store_dir);
        for epoch in [&mut self.before, &mut self.after] {
            for p in epoch.inputs.iter_mut() {
                join(p);
            }
            if let Some(p) = epoch.metadata.as_mut() {
                join(p);
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.grid_size.is_finite() && self.grid_size > 0.0) {
            bail!("grid_size must be positive, got {}", self.grid_size);
        }
        for epoch in [&self.before, &self.after] {
            if epoch.inputs.is_empty() {
                bail!("epoch '{}' has no inputs", epoch.name);
            }
        }
        if self.before.name == self.after.name {
            bail!("epoch names must differ ('{}')", self.before.name);
        }
        self.gridifier.validate().map_err(anyhow::Error::msg)?;
        self.volume.validate().map_err(anyhow::Error::msg)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::TempSite;
    use volume_engine::BoundaryWeighting;

    const MINIMAL: &str = r#"
name: test
before:
  name: e1
  inputs: [e1]
after:
  name: e2
  inputs: [/abs/e2.obj]
"#;

    #[test]
    fn test_defaults_and_path_resolution() {
        let site = TempSite::new().unwrap();
        let path = site.write("analysis.yaml", MINIMAL).unwrap();
        let config = AnalysisConfig::from_file(&path).unwrap();

        assert_eq!(config.grid_size, 0.5);
        assert_eq!(config.before.inputs[0], site.path().join("e1"));
        assert_eq!(config.after.inputs[0], PathBuf::from("/abs/e2.obj"));
        assert_eq!(config.store_dir, site.path().join(".earthwork/grids"));
        assert_eq!(config.volume.weighting, BoundaryWeighting::ExactClip);
        assert_eq!(config.gridifier.max_cells, 10_000_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_engine_sections() {
        let yaml = format!(
            "{MINIMAL}\ngridifier:\n  max_cells: 1000\nvolume:\n  weighting: supersample:4\n  noise_threshold: 0.05\n"
        );
        let config: AnalysisConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config.gridifier.max_cells, 1000);
        assert_eq!(config.gridifier.hole_fill_passes, 2);
        assert_eq!(config.volume.weighting, BoundaryWeighting::Supersample { n: 4 });
        assert_eq!(config.volume.noise_threshold, 0.05);
    }

    #[test]
    fn test_validation() {
        let mut config: AnalysisConfig = serde_yaml::from_str(MINIMAL).unwrap();
        config.grid_size = 0.0;
        assert!(config.validate().is_err());

        let mut config: AnalysisConfig = serde_yaml::from_str(MINIMAL).unwrap();
        config.after.name = "e1".to_string();
        assert!(config.validate().is_err());

        let mut config: AnalysisConfig = serde_yaml::from_str(MINIMAL).unwrap();
        config.before.inputs.clear();
        assert!(config.validate().is_err());
    }
}
