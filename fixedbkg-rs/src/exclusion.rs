//! Swiss-cheese exclusion region.
//!
//! Everything except the PSF footprints of all sources and, optionally, the
//! first component of each extra exclusion region.

use crate::error::Result;
use crate::source::Source;
use skyreg::{Extent, Region};
use tracing::{debug, warn};

/// Output of [`build_exclusion`]
#[derive(Debug, Clone, PartialEq)]
pub struct Exclusion {
    /// `universe - source_circles - extra_shapes`
    pub region: Region,

    /// Union of every source's PSF footprint circle
    pub source_circles: Region,

    /// Union of the first component of every non-empty extra region
    pub extra_shapes: Region,
}

impl Exclusion {
    /// Everything the background annuli have to avoid
    pub fn excluded_shapes(&self) -> Region {
        self.source_circles.union(&self.extra_shapes)
    }
}

/// Build the exclusion region for a run.
///
/// Extra regions that resolve to nothing are skipped. Of the others only the
/// first listed component is kept: later components are usually large
/// low-selectivity shapes (a field-of-view clip, say) that slow down every
/// membership test without changing the result.
pub fn build_exclusion(sources: &[Source], extras: Option<&[Region]>) -> Result<Exclusion> {
    let mut source_circles = Region::empty();
    for source in sources {
        source_circles = source_circles.union(&source.inner_region()?);
    }

    let mut extra_shapes = Region::empty();
    for (idx, extra) in extras.unwrap_or_default().iter().enumerate() {
        if matches!(extra.extent(), Extent::Empty) {
            debug!("Extra exclusion region {} is empty, skipping", idx + 1);
            continue;
        }
        let Some(shape) = extra.first_shape() else {
            continue;
        };
        if shape.is_field() {
            warn!(
                "Extra exclusion region {} starts with field(), which would exclude everything; skipping",
                idx + 1
            );
            continue;
        }
        if extra.len() > 1 {
            debug!(
                "Extra exclusion region {} has {} components, keeping only {}",
                idx + 1,
                extra.len(),
                shape
            );
        }
        extra_shapes = extra_shapes.union(&Region::from_shape(shape.clone()));
    }

    let region = Region::universe()
        .subtract(&source_circles)?
        .subtract(&extra_shapes)?;

    debug!(
        "Exclusion region built: {} source circles, {} extra shapes",
        source_circles.len(),
        extra_shapes.len()
    );

    Ok(Exclusion {
        region,
        source_circles,
        extra_shapes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyreg::{Inclusion, Shape, parse_region};

    fn sources() -> Vec<Source> {
        Source::from_rows([(10.0, 10.0, 2.0), (30.0, 10.0, 3.0), (50.0, 10.0, 0.0)])
    }

    #[test]
    fn test_source_footprints_are_holes() {
        let exclusion = build_exclusion(&sources(), None).unwrap();

        // The zero-radius source contributes no circle
        assert_eq!(exclusion.source_circles.len(), 2);
        assert!(exclusion.extra_shapes.is_empty());

        assert!(!exclusion.region.contains(10.0, 11.0));
        assert!(!exclusion.region.contains(32.0, 10.0));
        assert!(exclusion.region.contains(20.0, 10.0));
        assert!(exclusion.region.contains(50.0, 10.0));
    }

    #[test]
    fn test_no_sources_is_universe() {
        let exclusion = build_exclusion(&[], None).unwrap();
        assert_eq!(exclusion.region, Region::universe());

        let empty_stack = build_exclusion(&[], Some(&[])).unwrap();
        assert_eq!(empty_stack.region, Region::universe());
    }

    #[test]
    fn test_only_first_component_of_extras_is_used() {
        let extra = parse_region("ellipse(70,10,4,2,0)*rotbox(0,0,1000,1000,0)").unwrap();
        let exclusion = build_exclusion(&sources(), Some(&[extra])).unwrap();

        assert_eq!(exclusion.extra_shapes.len(), 1);
        assert!(matches!(
            exclusion.extra_shapes.first_shape(),
            Some(Shape::Ellipse(_))
        ));
        assert!(!exclusion.region.contains(70.0, 10.0));
        assert!(exclusion.region.contains(80.0, 10.0));

        // One term: field minus every hole
        assert_eq!(exclusion.region.terms().len(), 1);
        assert!(exclusion
            .region
            .entries()
            .iter()
            .skip(1)
            .all(|entry| entry.inclusion == Inclusion::Exclude));
    }

    #[test]
    fn test_empty_extras_are_skipped() {
        let disjoint = Region::circle(0.0, 0.0, 1.0)
            .unwrap()
            .intersect(&Region::circle(100.0, 100.0, 1.0).unwrap());
        let with_empty = build_exclusion(&sources(), Some(&[Region::empty(), disjoint])).unwrap();
        let without = build_exclusion(&sources(), None).unwrap();
        assert_eq!(with_empty, without);
    }
}
