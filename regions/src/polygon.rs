use super::bounds::BoundingBox;
use super::error::{RegionError, Result};
use super::traits::*;
use geo::{BoundingRect, Coord, Intersects, LineString, Polygon as GeoPolygon};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

/// Closed polygon given by its vertices in order. The ring is closed implicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<(f64, f64)>,
    /// geo polygon built on first containment query
    #[serde(skip)]
    ring: OnceCell<GeoPolygon<f64>>,
}

impl Polygon {
    pub fn new(vertices: Vec<(f64, f64)>) -> Self {
        Self {
            vertices,
            ring: OnceCell::new(),
        }
    }

    fn geo_polygon(&self) -> &GeoPolygon<f64> {
        self.ring.get_or_init(|| {
            let coords: Vec<Coord<f64>> = self
                .vertices
                .iter()
                .map(|&(x, y)| Coord { x, y })
                .collect();
            GeoPolygon::new(LineString::new(coords), vec![])
        })
    }
}

impl PartialEq for Polygon {
    fn eq(&self, other: &Self) -> bool {
        self.vertices == other.vertices
    }
}

impl ShapeContainment for Polygon {
    fn contains_point(&self, x: f64, y: f64) -> bool {
        if self.vertices.len() < 3 {
            return false;
        }
        // Intersects counts points on the boundary as inside
        self.geo_polygon().intersects(&Coord { x, y })
    }
}

impl ShapeBounds for Polygon {
    fn bounding_box(&self) -> Option<BoundingBox> {
        self.geo_polygon()
            .bounding_rect()
            .map(|rect| BoundingBox::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y))
    }
}

impl ShapeValidation for Polygon {
    fn validate(&self) -> Result<()> {
        if self.vertices.len() < 3 {
            return Err(RegionError::invalid_geometry(format!(
                "Polygon requires at least 3 vertices, got {}",
                self.vertices.len()
            )));
        }
        for (idx, &(x, y)) in self.vertices.iter().enumerate() {
            if !x.is_finite() || !y.is_finite() {
                return Err(RegionError::invalid_coordinate(
                    format!("polygon_vertex_{}", idx),
                    if !x.is_finite() { x } else { y },
                ));
            }
        }
        Ok(())
    }
}

impl ShapeOps for Polygon {
    fn shape_type_name(&self) -> &'static str {
        "polygon"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polygon_containment() {
        let square = Polygon::new(vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);

        assert!(square.contains_point(5.0, 5.0));
        assert!(!square.contains_point(15.0, 5.0));
        assert!(!square.contains_point(-5.0, 5.0));
        // Edge and corner
        assert!(square.contains_point(10.0, 5.0));
        assert!(square.contains_point(0.0, 0.0));
    }

    #[test]
    fn test_polygon_bounds_and_validation() {
        let triangle = Polygon::new(vec![(0.0, 0.0), (5.0, 0.0), (2.5, 5.0)]);
        assert_eq!(
            triangle.bounding_box(),
            Some(BoundingBox::new(0.0, 0.0, 5.0, 5.0))
        );
        assert!(triangle.is_valid());

        let degenerate = Polygon::new(vec![(0.0, 0.0), (5.0, 0.0)]);
        assert!(!degenerate.is_valid());
        assert!(!degenerate.contains_point(1.0, 0.0));
    }

    #[test]
    fn test_polygon_serde_skips_cache() {
        let square = Polygon::new(vec![(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
        assert!(square.contains_point(1.0, 1.0));

        let json = serde_json::to_string(&square).unwrap();
        assert!(!json.contains("ring"));
        let back: Polygon = serde_json::from_str(&json).unwrap();
        assert_eq!(back, square);
        assert!(back.contains_point(1.0, 1.0));
    }
}
