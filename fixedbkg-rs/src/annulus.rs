//! Per-source background annulus assembly.
//!
//! The annulus is carved by every source footprint and extra exclusion
//! shape, clipped to the field of view when the field of view actually cuts
//! it, and finally cleaned of the source's own footprint circle. That circle
//! fills the annulus hole exactly, so dropping it only moves the inner edge
//! back into the region.

use crate::config::FixedCountsConfig;
use crate::error::{FixedBkgError, Result};
use crate::exclusion::Exclusion;
use crate::source::Source;
use skyreg::{Inclusion, Logic, Region, RegionError, Shape};
use tracing::debug;

/// Final background region of one source
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledAnnulus {
    pub region: Region,

    /// The field of view truncated the annulus and was intersected in
    pub clipped: bool,

    /// Grid area measured by the field-of-view comparison, before the own
    /// circle is dropped. `None` when no comparison ran.
    pub area: Option<f64>,
}

/// Build the background region for `source` with the given outer radius.
///
/// # Errors
/// - `FixedBkgError::Region` for invalid radii or area failures
/// - `FixedBkgError::MalformedRegion` if the rebuilt entry list is inconsistent
pub fn assemble_annulus(
    source: &Source,
    outer_radius: f64,
    exclusion: &Exclusion,
    fov: Option<&Region>,
    config: &FixedCountsConfig,
) -> Result<AssembledAnnulus> {
    let candidate = if outer_radius > source.inner_radius {
        Region::annulus(source.x, source.y, source.inner_radius, outer_radius)?
            .subtract(&exclusion.excluded_shapes())?
    } else {
        debug!("Source {}: zero-width annulus", source.index);
        Region::empty()
    };

    let (candidate, clipped, area) = match fov {
        Some(_) if candidate.is_empty() => (candidate, false, Some(0.0)),
        Some(fov) => clip_to_fov(source, candidate, fov, config)?,
        None => (candidate, false, None),
    };

    let region = remove_own_circle(&candidate, source)?;
    Ok(AssembledAnnulus {
        region,
        clipped,
        area,
    })
}

/// Intersect with the field of view only when that changes the area.
/// Returns the kept region, whether it was clipped, and its area.
fn clip_to_fov(
    source: &Source,
    candidate: Region,
    fov: &Region,
    config: &FixedCountsConfig,
) -> Result<(Region, bool, Option<f64>)> {
    let clipped = candidate.intersect(fov);
    let full_area = candidate.area(config.area_bin_size)?;
    let clipped_area = clipped.area(config.area_bin_size)?;

    if config.areas_close(full_area, clipped_area) {
        Ok((candidate, false, Some(full_area)))
    } else {
        debug!(
            "Source {}: field of view cuts the annulus ({:.1} -> {:.1} px^2)",
            source.index, full_area, clipped_area
        );
        Ok((clipped, true, Some(clipped_area)))
    }
}

/// Drop the source's own footprint circle from the AND-excluded entries and
/// rebuild the region by folding the remaining entries left to right.
pub fn remove_own_circle(region: &Region, source: &Source) -> Result<Region> {
    let own = match source.inner_circle()? {
        Some(shape) => shape,
        None => return Ok(region.clone()),
    };

    let is_own_carve_out = |shape: &Shape, inclusion: Inclusion, logic: Logic| {
        inclusion == Inclusion::Exclude && logic == Logic::And && *shape == own
    };

    let kept = region
        .entries()
        .iter()
        .filter(|entry| !is_own_carve_out(&entry.shape, entry.inclusion, entry.logic))
        .cloned();

    Region::from_entries(kept).map_err(|e| match e {
        RegionError::MalformedRegion { message } => FixedBkgError::MalformedRegion {
            index: source.index,
            message,
        },
        other => other.into(),
    })
}
