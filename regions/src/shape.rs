use crate::bounds::BoundingBox;
use crate::circle::{Annulus, Circle};
use crate::ellipse::Ellipse;
use crate::error::Result;
use crate::polygon::Polygon;
use crate::rectangle::Rectangle;
use crate::traits::*;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A primitive 2D shape in pixel coordinates.
///
/// Shapes are the leaves of a [`Region`](crate::Region). `Field` is the whole
/// plane; every other variant is bounded.
///
/// # Example
///
/// ```rust
/// use skyreg::{Circle, Shape, ShapeContainment};
///
/// let shape = Shape::Circle(Circle { x: 10.0, y: 10.0, radius: 2.0 });
/// assert!(shape.contains_point(11.0, 10.0));
/// assert_eq!(shape.to_string(), "circle(10,10,2)");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Shape {
    Field,
    Circle(Circle),
    Annulus(Annulus),
    Ellipse(Ellipse),
    Rectangle(Rectangle),
    Polygon(Polygon),
}

impl ShapeContainment for Shape {
    fn contains_point(&self, x: f64, y: f64) -> bool {
        match self {
            Shape::Field => true,
            Shape::Circle(circle) => circle.contains_point(x, y),
            Shape::Annulus(annulus) => annulus.contains_point(x, y),
            Shape::Ellipse(ellipse) => ellipse.contains_point(x, y),
            Shape::Rectangle(rect) => rect.contains_point(x, y),
            Shape::Polygon(poly) => poly.contains_point(x, y),
        }
    }
}

impl ShapeBounds for Shape {
    fn bounding_box(&self) -> Option<BoundingBox> {
        match self {
            Shape::Field => None,
            Shape::Circle(circle) => circle.bounding_box(),
            Shape::Annulus(annulus) => annulus.bounding_box(),
            Shape::Ellipse(ellipse) => ellipse.bounding_box(),
            Shape::Rectangle(rect) => rect.bounding_box(),
            Shape::Polygon(poly) => poly.bounding_box(),
        }
    }
}

impl ShapeValidation for Shape {
    fn validate(&self) -> Result<()> {
        match self {
            Shape::Field => Ok(()),
            Shape::Circle(circle) => circle.validate(),
            Shape::Annulus(annulus) => annulus.validate(),
            Shape::Ellipse(ellipse) => ellipse.validate(),
            Shape::Rectangle(rect) => rect.validate(),
            Shape::Polygon(poly) => poly.validate(),
        }
    }
}

impl ShapeOps for Shape {
    fn shape_type_name(&self) -> &'static str {
        match self {
            Shape::Field => "field",
            Shape::Circle(circle) => circle.shape_type_name(),
            Shape::Annulus(annulus) => annulus.shape_type_name(),
            Shape::Ellipse(ellipse) => ellipse.shape_type_name(),
            Shape::Rectangle(rect) => rect.shape_type_name(),
            Shape::Polygon(poly) => poly.shape_type_name(),
        }
    }
}

impl Shape {
    pub fn is_field(&self) -> bool {
        matches!(self, Shape::Field)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.shape_type_name();
        match self {
            Shape::Field => write!(f, "{}()", name),
            Shape::Circle(c) => write!(f, "{}({},{},{})", name, c.x, c.y, c.radius),
            Shape::Annulus(a) => write!(
                f,
                "{}({},{},{},{})",
                name, a.x, a.y, a.inner_radius, a.outer_radius
            ),
            Shape::Ellipse(e) => write!(
                f,
                "{}({},{},{},{},{})",
                name, e.x, e.y, e.radius_x, e.radius_y, e.angle_deg
            ),
            Shape::Rectangle(r) => write!(
                f,
                "{}({},{},{},{},{})",
                name, r.x, r.y, r.width, r.height, r.angle_deg
            ),
            Shape::Polygon(p) => write!(
                f,
                "{}({})",
                name,
                p.vertices.iter().map(|(x, y)| format!("{},{}", x, y)).join(",")
            ),
        }
    }
}
