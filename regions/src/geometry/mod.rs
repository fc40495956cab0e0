//! Geometry construction utilities for creating validated shapes from raw
//! parameters.
//!
//! This module provides helper functions to create `Shape` variants from
//! plain numbers, as they arrive from region files or from computed radii.

pub mod construction;

pub use construction::{
    create_annulus, create_circle, create_ellipse, create_polygon, create_polygon_flat,
    create_rectangle,
};
