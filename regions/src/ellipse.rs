use super::bounds::BoundingBox;
use super::circle::check_center;
use super::error::{RegionError, Result};
use super::traits::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub x: f64,
    pub y: f64,
    pub radius_x: f64,
    pub radius_y: f64,
    pub angle_deg: f64, // counter-clockwise from +x
}

impl ShapeContainment for Ellipse {
    fn contains_point(&self, x: f64, y: f64) -> bool {
        let (sin_a, cos_a) = self.angle_deg.to_radians().sin_cos();
        let dx = x - self.x;
        let dy = y - self.y;

        // Rotate point into the ellipse frame
        let rotated_x = dx * cos_a + dy * sin_a;
        let rotated_y = -dx * sin_a + dy * cos_a;

        let normalized = (rotated_x / self.radius_x).powi(2) + (rotated_y / self.radius_y).powi(2);
        normalized <= 1.0
    }
}

impl ShapeBounds for Ellipse {
    fn bounding_box(&self) -> Option<BoundingBox> {
        let (sin_a, cos_a) = self.angle_deg.to_radians().sin_cos();

        // Maximum extents along each axis after rotation
        let extent_x = ((self.radius_x * cos_a).powi(2) + (self.radius_y * sin_a).powi(2)).sqrt();
        let extent_y = ((self.radius_x * sin_a).powi(2) + (self.radius_y * cos_a).powi(2)).sqrt();

        Some(BoundingBox::around(self.x, self.y, extent_x, extent_y))
    }
}

impl ShapeValidation for Ellipse {
    fn validate(&self) -> Result<()> {
        check_center(self.x, self.y, "ellipse")?;
        if !self.angle_deg.is_finite() {
            return Err(RegionError::invalid_coordinate("ellipse_angle", self.angle_deg));
        }
        if self.radius_x <= 0.0 || !self.radius_x.is_finite() {
            return Err(RegionError::invalid_geometry(format!(
                "Ellipse radius_x must be positive and finite, got {}",
                self.radius_x
            )));
        }
        if self.radius_y <= 0.0 || !self.radius_y.is_finite() {
            return Err(RegionError::invalid_geometry(format!(
                "Ellipse radius_y must be positive and finite, got {}",
                self.radius_y
            )));
        }
        Ok(())
    }
}

impl ShapeOps for Ellipse {
    fn shape_type_name(&self) -> &'static str {
        "ellipse"
    }
}
