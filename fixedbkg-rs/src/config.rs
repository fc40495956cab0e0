use crate::error::{FixedBkgError, Result};
use serde::{Deserialize, Serialize};

/// Fixed-counts background configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedCountsConfig {
    /// Number of background events each annulus should enclose
    pub min_counts: usize,

    /// Optional cap on the outer radius, in pixels
    pub max_radius: Option<f64>,

    /// Cell size of the area integration grid, in pixels
    pub area_bin_size: f64,

    /// Relative tolerance of the FOV clipping area comparison
    pub clip_rel_tolerance: f64,

    /// Absolute tolerance of the FOV clipping area comparison, in square pixels
    pub clip_abs_tolerance: f64,
}

impl Default for FixedCountsConfig {
    fn default() -> Self {
        Self {
            min_counts: 50,
            max_radius: None,
            area_bin_size: 1.0,
            clip_rel_tolerance: 0.1,
            clip_abs_tolerance: 0.5,
        }
    }
}

impl FixedCountsConfig {
    /// Check the run-wide settings. Per-source checks happen in the solver.
    pub fn validate(&self) -> Result<()> {
        if self.min_counts == 0 {
            return Err(FixedBkgError::config("min_counts must be at least 1"));
        }
        if let Some(max_radius) = self.max_radius {
            if !max_radius.is_finite() || max_radius < 0.0 {
                return Err(FixedBkgError::config(format!(
                    "max_radius must be non-negative and finite, got {}",
                    max_radius
                )));
            }
        }
        if !self.area_bin_size.is_finite() || self.area_bin_size <= 0.0 {
            return Err(FixedBkgError::config(format!(
                "area_bin_size must be positive and finite, got {}",
                self.area_bin_size
            )));
        }
        for (name, value) in [
            ("clip_rel_tolerance", self.clip_rel_tolerance),
            ("clip_abs_tolerance", self.clip_abs_tolerance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(FixedBkgError::config(format!(
                    "{} must be non-negative and finite, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Area comparison used by the FOV clipping step:
    /// `|a - b| <= max(rel * max(|a|, |b|), abs)`
    pub fn areas_close(&self, a: f64, b: f64) -> bool {
        let relative = self.clip_rel_tolerance * a.abs().max(b.abs());
        (a - b).abs() <= relative.max(self.clip_abs_tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = FixedCountsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_counts, 50);
        assert_eq!(config.max_radius, None);
    }

    #[test]
    fn test_invalid_settings() {
        let zero_counts = FixedCountsConfig {
            min_counts: 0,
            ..Default::default()
        };
        assert!(zero_counts.validate().unwrap_err().is_config_error());

        let bad_bin = FixedCountsConfig {
            area_bin_size: 0.0,
            ..Default::default()
        };
        assert!(bad_bin.validate().is_err());

        let bad_cap = FixedCountsConfig {
            max_radius: Some(f64::NAN),
            ..Default::default()
        };
        assert!(bad_cap.validate().is_err());

        let bad_tol = FixedCountsConfig {
            clip_rel_tolerance: -0.1,
            ..Default::default()
        };
        assert!(bad_tol.validate().is_err());
    }

    #[test]
    fn test_areas_close() {
        let config = FixedCountsConfig::default();
        assert!(config.areas_close(100.0, 95.0));
        assert!(!config.areas_close(100.0, 80.0));
        // Absolute floor for tiny areas
        assert!(config.areas_close(0.2, 0.6));
        assert!(config.areas_close(0.0, 0.0));
        assert!(!config.areas_close(0.0, 1.0));
    }
}
