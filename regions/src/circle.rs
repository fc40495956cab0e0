use super::bounds::BoundingBox;
use super::error::{RegionError, Result};
use super::traits::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl ShapeContainment for Circle {
    fn contains_point(&self, x: f64, y: f64) -> bool {
        f64::hypot(x - self.x, y - self.y) <= self.radius
    }
}

impl ShapeBounds for Circle {
    fn bounding_box(&self) -> Option<BoundingBox> {
        Some(BoundingBox::around(self.x, self.y, self.radius, self.radius))
    }
}

impl ShapeValidation for Circle {
    fn validate(&self) -> Result<()> {
        check_center(self.x, self.y, "circle")?;
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(RegionError::invalid_geometry(format!(
                "Circle radius must be non-negative and finite, got {}",
                self.radius
            )));
        }
        Ok(())
    }
}

impl ShapeOps for Circle {
    fn shape_type_name(&self) -> &'static str {
        "circle"
    }
}

/// Ring between two concentric circles, both boundaries included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Annulus {
    pub x: f64,
    pub y: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
}

impl ShapeContainment for Annulus {
    fn contains_point(&self, x: f64, y: f64) -> bool {
        let distance = f64::hypot(x - self.x, y - self.y);
        distance >= self.inner_radius && distance <= self.outer_radius
    }
}

impl ShapeBounds for Annulus {
    fn bounding_box(&self) -> Option<BoundingBox> {
        Some(BoundingBox::around(
            self.x,
            self.y,
            self.outer_radius,
            self.outer_radius,
        ))
    }
}

impl ShapeValidation for Annulus {
    fn validate(&self) -> Result<()> {
        check_center(self.x, self.y, "annulus")?;
        if !self.inner_radius.is_finite() || self.inner_radius < 0.0 {
            return Err(RegionError::invalid_coordinate(
                "annulus_inner_radius",
                self.inner_radius,
            ));
        }
        if !self.outer_radius.is_finite() {
            return Err(RegionError::invalid_coordinate(
                "annulus_outer_radius",
                self.outer_radius,
            ));
        }
        if self.outer_radius < self.inner_radius {
            return Err(RegionError::invalid_geometry(format!(
                "Annulus outer radius {} is smaller than inner radius {}",
                self.outer_radius, self.inner_radius
            )));
        }
        Ok(())
    }
}

impl ShapeOps for Annulus {
    fn shape_type_name(&self) -> &'static str {
        "annulus"
    }
}

pub(crate) fn check_center(x: f64, y: f64, shape: &str) -> Result<()> {
    if !x.is_finite() {
        return Err(RegionError::invalid_coordinate(format!("{}_x", shape), x));
    }
    if !y.is_finite() {
        return Err(RegionError::invalid_coordinate(format!("{}_y", shape), y));
    }
    Ok(())
}
