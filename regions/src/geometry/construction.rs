use crate::circle::{Annulus, Circle};
use crate::ellipse::Ellipse;
use crate::error::{RegionError, Result};
use crate::polygon::Polygon;
use crate::rectangle::Rectangle;
use crate::shape::Shape;
use crate::traits::ShapeValidation;

/// Create a circle shape
///
/// # Errors
/// Returns `RegionError::InvalidCoordinate` for a non-finite center and
/// `RegionError::InvalidGeometry` for a negative or non-finite radius.
pub fn create_circle(x: f64, y: f64, radius: f64) -> Result<Shape> {
    let circle = Circle { x, y, radius };
    circle.validate()?;
    Ok(Shape::Circle(circle))
}

/// Create an annulus shape between `inner_radius` and `outer_radius`
///
/// # Errors
/// Returns `RegionError::InvalidGeometry` if `outer_radius < inner_radius`.
pub fn create_annulus(x: f64, y: f64, inner_radius: f64, outer_radius: f64) -> Result<Shape> {
    let annulus = Annulus {
        x,
        y,
        inner_radius,
        outer_radius,
    };
    annulus.validate()?;
    Ok(Shape::Annulus(annulus))
}

/// Create an ellipse shape, `angle_deg` counter-clockwise from +x
pub fn create_ellipse(
    x: f64,
    y: f64,
    radius_x: f64,
    radius_y: f64,
    angle_deg: f64,
) -> Result<Shape> {
    let ellipse = Ellipse {
        x,
        y,
        radius_x,
        radius_y,
        angle_deg,
    };
    ellipse.validate()?;
    Ok(Shape::Ellipse(ellipse))
}

/// Create a rotated box from its center, full sides and angle
pub fn create_rectangle(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    angle_deg: f64,
) -> Result<Shape> {
    let rect = Rectangle {
        x,
        y,
        width,
        height,
        angle_deg,
    };
    rect.validate()?;
    Ok(Shape::Rectangle(rect))
}

/// Create a polygon from raw vertices
///
/// # Errors
/// Returns `RegionError::InvalidGeometry` if:
/// - Less than 3 vertices are provided
/// - Any coordinate values are not finite
pub fn create_polygon(vertices: Vec<(f64, f64)>) -> Result<Shape> {
    let poly = Polygon::new(vertices);
    poly.validate()?;
    Ok(Shape::Polygon(poly))
}

/// Create a polygon from a flat `[x1, y1, x2, y2, ...]` list
pub fn create_polygon_flat(coords: &[f64]) -> Result<Shape> {
    if coords.len() % 2 != 0 {
        return Err(RegionError::invalid_geometry(format!(
            "Polygon needs an even number of coordinates, got {}",
            coords.len()
        )));
    }
    create_polygon(coords.chunks_exact(2).map(|c| (c[0], c[1])).collect())
}
