use crate::error::{FixedBkgError, Result};
use serde::{Deserialize, Serialize};
use skyreg::{Region, Shape, create_circle};

/// A point source in detector pixel coordinates.
///
/// `inner_radius` is the PSF footprint radius, computed upstream. The detector
/// angles are carried through to the report only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    /// 1-based position in the input list
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub inner_radius: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theta: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phi: Option<f64>,
}

impl Source {
    pub fn new(index: usize, x: f64, y: f64, inner_radius: f64) -> Self {
        Self {
            index,
            x,
            y,
            inner_radius,
            theta: None,
            phi: None,
        }
    }

    pub fn with_angles(mut self, theta: f64, phi: f64) -> Self {
        self.theta = Some(theta);
        self.phi = Some(phi);
        self
    }

    /// Build 1-based sources from `(x, y, inner_radius)` rows
    pub fn from_rows(rows: impl IntoIterator<Item = (f64, f64, f64)>) -> Vec<Source> {
        rows.into_iter()
            .enumerate()
            .map(|(i, (x, y, r))| Source::new(i + 1, x, y, r))
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(FixedBkgError::invalid_input(format!(
                "source {} has a non-finite position ({}, {})",
                self.index, self.x, self.y
            )));
        }
        if !self.inner_radius.is_finite() || self.inner_radius < 0.0 {
            return Err(FixedBkgError::config(format!(
                "source {} has an invalid inner radius {}",
                self.index, self.inner_radius
            )));
        }
        Ok(())
    }

    /// The PSF footprint circle, `None` for a zero inner radius
    pub fn inner_circle(&self) -> Result<Option<Shape>> {
        if self.inner_radius > 0.0 {
            Ok(Some(create_circle(self.x, self.y, self.inner_radius)?))
        } else {
            Ok(None)
        }
    }

    /// Region holding the PSF footprint, empty for a zero inner radius
    pub fn inner_region(&self) -> Result<Region> {
        Ok(self
            .inner_circle()?
            .map(Region::from_shape)
            .unwrap_or_default())
    }

    /// Distance from the source centre to a point
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        f64::hypot(x - self.x, y - self.y)
    }
}
