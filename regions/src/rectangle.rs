use super::bounds::BoundingBox;
use super::circle::check_center;
use super::error::{RegionError, Result};
use super::traits::*;
use serde::{Deserialize, Serialize};

/// Rotated box given by its center, full width/height and rotation angle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub angle_deg: f64,
}

impl ShapeContainment for Rectangle {
    fn contains_point(&self, x: f64, y: f64) -> bool {
        let (sin_a, cos_a) = self.angle_deg.to_radians().sin_cos();
        let dx = x - self.x;
        let dy = y - self.y;
        let rotated_x = dx * cos_a + dy * sin_a;
        let rotated_y = -dx * sin_a + dy * cos_a;

        // Inclusive bounds
        rotated_x.abs() <= self.width / 2.0 && rotated_y.abs() <= self.height / 2.0
    }
}

impl ShapeBounds for Rectangle {
    fn bounding_box(&self) -> Option<BoundingBox> {
        let (sin_a, cos_a) = self.angle_deg.to_radians().sin_cos();
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        let extent_x = (half_w * cos_a).abs() + (half_h * sin_a).abs();
        let extent_y = (half_w * sin_a).abs() + (half_h * cos_a).abs();
        Some(BoundingBox::around(self.x, self.y, extent_x, extent_y))
    }
}

impl ShapeValidation for Rectangle {
    fn validate(&self) -> Result<()> {
        check_center(self.x, self.y, "rotbox")?;
        if !self.angle_deg.is_finite() {
            return Err(RegionError::invalid_coordinate("rotbox_angle", self.angle_deg));
        }
        if self.width <= 0.0 || !self.width.is_finite() || self.height <= 0.0 || !self.height.is_finite()
        {
            return Err(RegionError::invalid_geometry(format!(
                "Box sides must be positive and finite, got {} x {}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

impl ShapeOps for Rectangle {
    fn shape_type_name(&self) -> &'static str {
        "rotbox"
    }
}
