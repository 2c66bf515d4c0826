//! Configuration for volume computation.

use serde::{Deserialize, Serialize};

use crate::weighting::BoundaryWeighting;

/// Configuration for volume computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeConfig {
    /// Strategy for cells partially covered by the boundary.
    pub weighting: BoundaryWeighting,

    /// Height differences smaller than this are noise: counted in area,
    /// excluded from cut and fill.
    pub noise_threshold: f64,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            weighting: BoundaryWeighting::ExactClip,
            noise_threshold: 0.01,
        }
    }
}

impl VolumeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("VOLUME_WEIGHTING") {
            if let Ok(w) = val.parse() {
                config.weighting = w;
            }
        }

        if let Ok(val) = std::env::var("VOLUME_NOISE_THRESHOLD") {
            if let Ok(t) = val.parse() {
                config.noise_threshold = t;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !self.noise_threshold.is_finite() || self.noise_threshold < 0.0 {
            return Err("noise_threshold must be a finite value >= 0".to_string());
        }

        if let BoundaryWeighting::Supersample { n } = self.weighting {
            if n == 0 || n > 1000 {
                return Err("supersample resolution must be 1-1000".to_string());
            }
        }

        Ok(())
    }
}
