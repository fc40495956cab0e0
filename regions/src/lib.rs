//! # skyreg
//!
//! Composable 2D regions for detector-image analysis.
//!
//! This library provides the region algebra used to build exclusion and
//! background regions around point sources: primitive shapes, boolean
//! composition, point membership, numerical area and a plain-text shape-list
//! file format.
//!
//! ## Overview
//!
//! - **Shapes**: field, circle, annulus, ellipse, rotated box and polygon
//! - **Regions**: ordered `(shape, inclusion, logic)` entry lists with union,
//!   intersection, complement and subtraction
//! - **Membership**: single-point and rayon-parallel batch queries
//! - **Area**: grid integration with a caller-chosen bin size
//! - **Persistence**: ASCII shape lists and JSON
//!
//! ## Quick Start
//!
//! ```rust
//! use skyreg::{Region, parse_region, to_ascii};
//!
//! // A swiss-cheese region: everything except two source footprints
//! let sources = Region::circle(100.0, 100.0, 5.0)?
//!     .union(&Region::circle(130.0, 100.0, 4.0)?);
//! let background = Region::universe().subtract(&sources)?;
//!
//! assert!(background.contains(115.0, 100.0));
//! assert!(!background.contains(101.0, 101.0));
//!
//! let text = to_ascii(&background);
//! assert_eq!(parse_region(&text)?, background);
//! # Ok::<(), skyreg::RegionError>(())
//! ```
//!
//! ## Error Handling
//!
//! The library uses [`RegionError`] for all error conditions. Fallible
//! operations return [`Result<T, RegionError>`](RegionResult).

pub mod batch_filtering;
pub mod bounds;
pub mod circle;
pub mod ellipse;
pub mod error;
pub mod format;
pub mod geometry;
pub mod polygon;
pub mod rectangle;
pub mod region;
pub mod shape;
pub mod traits;

/// Error types for region operations
pub use error::{RegionError, Result as RegionResult};

/// Batch membership
pub use batch_filtering::{contains_batch, count_inside, filter_points};

/// Bounding boxes
pub use bounds::BoundingBox;

/// Primitive shapes
pub use circle::{Annulus, Circle};
pub use ellipse::Ellipse;
pub use polygon::Polygon;
pub use rectangle::Rectangle;
pub use shape::Shape;

/// Geometry construction helpers
pub use geometry::{
    create_annulus, create_circle, create_ellipse, create_polygon, create_polygon_flat,
    create_rectangle,
};

/// Composite regions
pub use region::{Extent, Inclusion, Logic, MAX_EXPANDED_TERMS, Region, RegionEntry};

/// Region files
pub use format::{
    RegionFormat, from_json, parse_region, read_region_file, to_ascii, to_json,
    write_region_file,
};

/// Shape traits
pub use traits::{ShapeBounds, ShapeContainment, ShapeOps, ShapeValidation};
