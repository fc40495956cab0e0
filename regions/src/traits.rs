use crate::bounds::BoundingBox;
use crate::error::Result;

/// Trait for shapes that support point containment testing
pub trait ShapeContainment {
    /// Check if a point (in pixel coordinates) is inside the shape, boundary included
    fn contains_point(&self, x: f64, y: f64) -> bool;
}

/// Trait for shapes that have a bounding box
pub trait ShapeBounds {
    /// Calculate the bounding box, or `None` if the shape is unbounded
    fn bounding_box(&self) -> Option<BoundingBox>;
}

/// Trait for shapes that can be validated
pub trait ShapeValidation {
    /// Check that all parameters are finite and geometrically meaningful
    fn validate(&self) -> Result<()>;

    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Common trait combining all shape behaviors
pub trait ShapeOps: ShapeContainment + ShapeBounds + ShapeValidation {
    /// Get the name this shape is written under in region files
    fn shape_type_name(&self) -> &'static str;
}
