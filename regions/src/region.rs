//! Composite regions and their boolean algebra.
//!
//! A [`Region`] is an ordered list of [`RegionEntry`] values. Each entry pairs a
//! [`Shape`] with an [`Inclusion`] (is the shape itself or its complement
//! meant) and a [`Logic`] tag describing how it combines with what came before:
//!
//! - `NoOp` marks the first entry
//! - `Or` starts a new term
//! - `And` joins the current term
//!
//! Evaluation is sum-of-products: a point is inside the region if, for at
//! least one term, every entry of that term is satisfied. AND binds tighter
//! than OR, so reading the list left to right an `And` entry intersects into
//! the trailing term only.

use crate::bounds::BoundingBox;
use crate::error::{RegionError, Result};
use crate::geometry::{create_annulus, create_circle, create_polygon};
use crate::shape::Shape;
use crate::traits::{ShapeBounds, ShapeContainment, ShapeValidation};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Upper bound on the number of terms a complement may expand into.
pub const MAX_EXPANDED_TERMS: usize = 1 << 16;

/// Whether an entry stands for its shape or for the shape's complement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Inclusion {
    Include,
    Exclude,
}

impl Inclusion {
    pub fn negate(self) -> Self {
        match self {
            Inclusion::Include => Inclusion::Exclude,
            Inclusion::Exclude => Inclusion::Include,
        }
    }
}

/// How an entry combines with the entries before it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Logic {
    /// First entry of the region
    NoOp,
    /// Starts a new term
    Or,
    /// Joins the current term
    And,
}

/// One `(shape, inclusion, logic)` element of a region's entry list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionEntry {
    pub shape: Shape,
    pub inclusion: Inclusion,
    pub logic: Logic,
}

impl RegionEntry {
    pub fn new(shape: Shape, inclusion: Inclusion, logic: Logic) -> Self {
        Self {
            shape,
            inclusion,
            logic,
        }
    }

    /// True if the point satisfies this entry on its own
    pub fn is_satisfied(&self, x: f64, y: f64) -> bool {
        self.shape.contains_point(x, y) == (self.inclusion == Inclusion::Include)
    }
}

/// Spatial extent of a region
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extent {
    Empty,
    Bounded(BoundingBox),
    Unbounded,
}

type Term = Vec<(Shape, Inclusion)>;

/// An immutable set of 2D points built from shapes and boolean operators.
///
/// Operators never modify their operands; they return new regions.
///
/// # Example
///
/// ```rust
/// use skyreg::Region;
///
/// let ring = Region::annulus(100.0, 100.0, 5.0, 20.0)?;
/// let hole = Region::circle(110.0, 100.0, 3.0)?;
/// let background = ring.subtract(&hole)?;
///
/// assert!(background.contains(100.0, 115.0));
/// assert!(!background.contains(110.0, 100.0));
/// assert!(!background.contains(100.0, 100.0));
/// # Ok::<(), skyreg::RegionError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RegionEntry>", into = "Vec<RegionEntry>")]
pub struct Region {
    entries: Vec<RegionEntry>,
}

impl Region {
    /// The region containing no points
    pub fn empty() -> Self {
        Self::default()
    }

    /// The whole plane
    pub fn universe() -> Self {
        Self::from_shape(Shape::Field)
    }

    /// A region made of one included shape
    pub fn from_shape(shape: Shape) -> Self {
        Self::single(shape, Inclusion::Include)
    }

    fn single(shape: Shape, inclusion: Inclusion) -> Self {
        Self {
            entries: vec![RegionEntry::new(shape, inclusion, Logic::NoOp)],
        }
    }

    pub fn circle(x: f64, y: f64, radius: f64) -> Result<Self> {
        Ok(Self::from_shape(create_circle(x, y, radius)?))
    }

    pub fn annulus(x: f64, y: f64, inner_radius: f64, outer_radius: f64) -> Result<Self> {
        Ok(Self::from_shape(create_annulus(
            x,
            y,
            inner_radius,
            outer_radius,
        )?))
    }

    pub fn polygon(vertices: Vec<(f64, f64)>) -> Result<Self> {
        Ok(Self::from_shape(create_polygon(vertices)?))
    }

    /// Rebuild a region from an ordered entry list by folding left to right.
    ///
    /// `NoOp` starts the accumulator, `Or` unions the entry into it and `And`
    /// intersects the entry into the accumulator's trailing term.
    ///
    /// # Errors
    /// Returns `RegionError::MalformedRegion` if the list does not start with a
    /// `NoOp` entry or has a `NoOp` entry after the head.
    pub fn from_entries(entries: impl IntoIterator<Item = RegionEntry>) -> Result<Self> {
        let mut acc: Option<Region> = None;
        for (idx, entry) in entries.into_iter().enumerate() {
            let RegionEntry {
                shape,
                inclusion,
                logic,
            } = entry;
            acc = Some(match (logic, acc) {
                (Logic::NoOp, None) => Region::single(shape, inclusion),
                (Logic::Or, Some(region)) => region.union(&Region::single(shape, inclusion)),
                (Logic::And, Some(mut region)) => {
                    region
                        .entries
                        .push(RegionEntry::new(shape, inclusion, Logic::And));
                    region
                }
                (Logic::NoOp, Some(_)) => {
                    return Err(RegionError::malformed(format!(
                        "entry {} restarts an already started region",
                        idx
                    )));
                }
                (logic, None) => {
                    return Err(RegionError::malformed(format!(
                        "region starts with a {:?} entry instead of NoOp",
                        logic
                    )));
                }
            });
        }
        Ok(acc.unwrap_or_default())
    }

    pub fn entries(&self) -> &[RegionEntry] {
        &self.entries
    }

    /// Number of entries (not terms)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.entries.iter().map(|entry| &entry.shape)
    }

    /// Shape of the first entry, the first listed component
    pub fn first_shape(&self) -> Option<&Shape> {
        self.entries.first().map(|entry| &entry.shape)
    }

    /// Check every shape's parameters
    pub fn validate(&self) -> Result<()> {
        for (idx, entry) in self.entries.iter().enumerate() {
            entry
                .shape
                .validate()
                .map_err(|e| e.with_context(format!("entry {}", idx)))?;
        }
        Ok(())
    }

    /// Split the entry list into its OR-separated terms
    pub fn terms(&self) -> Vec<&[RegionEntry]> {
        let mut terms = Vec::new();
        let mut start = 0;
        for (idx, entry) in self.entries.iter().enumerate().skip(1) {
            if entry.logic != Logic::And {
                terms.push(&self.entries[start..idx]);
                start = idx;
            }
        }
        if !self.entries.is_empty() {
            terms.push(&self.entries[start..]);
        }
        terms
    }

    fn owned_terms(&self) -> Vec<Term> {
        self.terms()
            .into_iter()
            .map(|term| {
                term.iter()
                    .map(|entry| (entry.shape.clone(), entry.inclusion))
                    .collect()
            })
            .collect()
    }

    fn from_terms(terms: Vec<Term>) -> Self {
        let mut entries = Vec::new();
        for term in terms.into_iter().filter_map(normalize_term) {
            for (pos, (shape, inclusion)) in term.into_iter().enumerate() {
                let logic = match (entries.is_empty(), pos) {
                    (true, _) => Logic::NoOp,
                    (false, 0) => Logic::Or,
                    (false, _) => Logic::And,
                };
                entries.push(RegionEntry::new(shape, inclusion, logic));
            }
        }
        Self { entries }
    }

    /// Points in either region
    pub fn union(&self, other: &Region) -> Region {
        if self.is_empty() {
            return other.clone();
        }
        let mut entries = self.entries.clone();
        entries.extend(other.entries.iter().map(|entry| match entry.logic {
            Logic::NoOp => RegionEntry::new(entry.shape.clone(), entry.inclusion, Logic::Or),
            _ => entry.clone(),
        }));
        Region { entries }
    }

    /// Points in both regions, distributed over the terms of each side
    pub fn intersect(&self, other: &Region) -> Region {
        if self.is_empty() || other.is_empty() {
            return Region::empty();
        }
        let left = self.owned_terms();
        let right = other.owned_terms();
        let mut terms = Vec::with_capacity(left.len() * right.len());
        for a in &left {
            for b in &right {
                terms.push(a.iter().chain(b.iter()).cloned().collect());
            }
        }
        Region::from_terms(terms)
    }

    /// Points not in this region.
    ///
    /// # Errors
    /// Returns `RegionError::TooComplex` if the De Morgan expansion would exceed
    /// [`MAX_EXPANDED_TERMS`] terms.
    pub fn complement(&self) -> Result<Region> {
        if self.is_empty() {
            return Ok(Region::universe());
        }
        let terms = self.owned_terms();
        let expanded = terms
            .iter()
            .try_fold(1usize, |acc, term| acc.checked_mul(term.len()))
            .unwrap_or(usize::MAX);
        if expanded > MAX_EXPANDED_TERMS {
            return Err(RegionError::TooComplex {
                terms: expanded,
                limit: MAX_EXPANDED_TERMS,
            });
        }

        // not(t1 or t2) = not(t1) and not(t2); each not(t) is an OR of negated entries
        let mut product: Vec<Term> = vec![Vec::new()];
        for term in terms {
            product = product
                .iter()
                .flat_map(|partial| {
                    term.iter().map(move |(shape, inclusion)| {
                        let mut next = partial.clone();
                        next.push((shape.clone(), inclusion.negate()));
                        next
                    })
                })
                .collect();
        }
        Ok(Region::from_terms(product))
    }

    /// `self ∩ ¬other`
    pub fn subtract(&self, other: &Region) -> Result<Region> {
        if other.is_empty() {
            return Ok(self.clone());
        }
        Ok(self.intersect(&other.complement()?))
    }

    /// Point-membership test, boundaries included
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let mut term_ok = false;
        for (idx, entry) in self.entries.iter().enumerate() {
            if entry.logic != Logic::And {
                if idx > 0 && term_ok {
                    return true;
                }
                term_ok = true;
            }
            if term_ok && !entry.is_satisfied(x, y) {
                term_ok = false;
            }
        }
        term_ok
    }

    /// Bounding extent of the region.
    ///
    /// A term is bounded by the overlap of its bounded included shapes; a term
    /// with none of those makes the whole region unbounded.
    pub fn extent(&self) -> Extent {
        let mut total: Option<BoundingBox> = None;
        for term in self.terms() {
            let mut term_box: Option<Option<BoundingBox>> = None;
            for entry in term
                .iter()
                .filter(|entry| entry.inclusion == Inclusion::Include)
            {
                if let Some(bbox) = entry.shape.bounding_box() {
                    term_box = Some(match term_box {
                        None => Some(bbox),
                        Some(current) => current.and_then(|c| c.intersection(&bbox)),
                    });
                }
            }
            match term_box {
                None => return Extent::Unbounded,
                Some(None) => {} // disjoint shapes, empty term
                Some(Some(bbox)) => {
                    total = Some(total.map_or(bbox, |t| t.union(&bbox)));
                }
            }
        }
        total.map_or(Extent::Empty, Extent::Bounded)
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        match self.extent() {
            Extent::Bounded(bbox) => Some(bbox),
            Extent::Empty | Extent::Unbounded => None,
        }
    }

    /// Numerical area by grid integration.
    ///
    /// Counts the centres of `bin_size × bin_size` cells that fall inside the
    /// region. The grid is anchored at integer multiples of `bin_size`, so two
    /// regions are always sampled on the same points where they overlap.
    ///
    /// # Errors
    /// - `RegionError::InvalidGeometry` for a non-positive or non-finite bin size
    /// - `RegionError::Unbounded` if the region has no finite extent
    pub fn area(&self, bin_size: f64) -> Result<f64> {
        if !bin_size.is_finite() || bin_size <= 0.0 {
            return Err(RegionError::invalid_geometry(format!(
                "Area bin size must be positive and finite, got {}",
                bin_size
            )));
        }
        let bbox = match self.extent() {
            Extent::Empty => return Ok(0.0),
            Extent::Unbounded => {
                return Err(RegionError::unbounded(
                    "cannot integrate the area of an unbounded region",
                ));
            }
            Extent::Bounded(bbox) => bbox,
        };

        let i0 = (bbox.min_x / bin_size).floor() as i64;
        let i1 = (bbox.max_x / bin_size).ceil() as i64;
        let j0 = (bbox.min_y / bin_size).floor() as i64;
        let j1 = (bbox.max_y / bin_size).ceil() as i64;

        let hits: usize = (j0..j1)
            .into_par_iter()
            .map(|j| {
                let y = (j as f64 + 0.5) * bin_size;
                (i0..i1)
                    .filter(|&i| self.contains((i as f64 + 0.5) * bin_size, y))
                    .count()
            })
            .sum();

        Ok(hits as f64 * bin_size * bin_size)
    }
}

/// Simplify a term's field entries; `None` if the term is empty
fn normalize_term(term: Term) -> Option<Term> {
    if term
        .iter()
        .any(|(shape, inclusion)| shape.is_field() && *inclusion == Inclusion::Exclude)
    {
        return None;
    }
    let has_bounded_include = term
        .iter()
        .any(|(shape, inclusion)| !shape.is_field() && *inclusion == Inclusion::Include);
    let rest: Term = term
        .into_iter()
        .filter(|(shape, _)| !shape.is_field())
        .collect();
    if has_bounded_include {
        Some(rest)
    } else {
        // Only exclusions left: anchor them on the field
        let mut anchored = vec![(Shape::Field, Inclusion::Include)];
        anchored.extend(rest);
        Some(anchored)
    }
}

impl TryFrom<Vec<RegionEntry>> for Region {
    type Error = RegionError;

    fn try_from(entries: Vec<RegionEntry>) -> Result<Self> {
        let region = Region::from_entries(entries)?;
        region.validate()?;
        Ok(region)
    }
}

impl From<Region> for Vec<RegionEntry> {
    fn from(region: Region) -> Self {
        region.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn circles(centers: &[(f64, f64)], radius: f64) -> Region {
        centers.iter().fold(Region::empty(), |acc, &(x, y)| {
            acc.union(&Region::circle(x, y, radius).unwrap())
        })
    }

    #[test]
    fn test_universe_and_empty() {
        assert!(Region::universe().contains(1e9, -1e9));
        assert!(!Region::empty().contains(0.0, 0.0));
        assert!(Region::universe().complement().unwrap().is_empty());
        assert_eq!(Region::empty().complement().unwrap(), Region::universe());
    }

    #[test]
    fn test_union_starts_new_term() {
        let a = Region::circle(0.0, 0.0, 1.0).unwrap();
        let b = Region::circle(10.0, 0.0, 1.0).unwrap();
        let u = a.union(&b);

        assert_eq!(u.terms().len(), 2);
        assert_eq!(u.entries()[1].logic, Logic::Or);
        assert!(u.contains(0.0, 0.0));
        assert!(u.contains(10.0, 0.5));
        assert!(!u.contains(5.0, 0.0));
    }

    #[test]
    fn test_subtract_union_of_circles_is_single_term() {
        let holes = circles(&[(0.0, 0.0), (20.0, 0.0), (40.0, 0.0)], 2.0);
        let swiss = Region::universe().subtract(&holes).unwrap();

        assert_eq!(swiss.terms().len(), 1);
        assert_eq!(swiss.entries()[0].shape, Shape::Field);
        assert_eq!(swiss.len(), 4);
        assert!(swiss
            .entries()
            .iter()
            .skip(1)
            .all(|e| e.inclusion == Inclusion::Exclude && e.logic == Logic::And));

        assert!(!swiss.contains(0.0, 1.0));
        assert!(!swiss.contains(40.0, -2.0));
        assert!(swiss.contains(10.0, 0.0));
    }

    #[test]
    fn test_intersect_distributes_over_terms() {
        let ring = Region::annulus(0.0, 0.0, 2.0, 10.0).unwrap();
        let left = Region::polygon(vec![(-20.0, -20.0), (0.0, -20.0), (0.0, 20.0), (-20.0, 20.0)])
            .unwrap();
        let right_top =
            Region::polygon(vec![(0.0, 0.0), (20.0, 0.0), (20.0, 20.0), (0.0, 20.0)]).unwrap();
        let fov = left.union(&right_top);

        let clipped = ring.intersect(&fov);
        assert_eq!(clipped.terms().len(), 2);
        assert!(clipped.contains(-5.0, -5.0));
        assert!(clipped.contains(5.0, 5.0));
        assert!(!clipped.contains(5.0, -5.0));
        assert!(!clipped.contains(0.5, 0.5)); // inside the hole
    }

    #[test]
    fn test_complement_of_multi_shape_term() {
        // not(A and B) = not A or not B
        let a = Region::circle(0.0, 0.0, 5.0).unwrap();
        let b = Region::circle(4.0, 0.0, 5.0).unwrap();
        let lens = a.intersect(&b);
        let outside = lens.complement().unwrap();

        assert_eq!(outside.terms().len(), 2);
        assert!(!outside.contains(2.0, 0.0));
        assert!(outside.contains(-4.0, 0.0));
        assert!(outside.contains(8.0, 0.0));
    }

    #[test]
    fn test_complement_too_complex() {
        // 17 terms of 2 shapes each expand into 2^17 terms
        let mut region = Region::empty();
        for i in 0..17 {
            let x = i as f64 * 100.0;
            let pair = Region::circle(x, 0.0, 5.0)
                .unwrap()
                .intersect(&Region::circle(x + 1.0, 0.0, 5.0).unwrap());
            region = region.union(&pair);
        }
        assert!(matches!(
            region.complement(),
            Err(RegionError::TooComplex { .. })
        ));
    }

    #[test]
    fn test_area_of_circle_and_annulus() {
        let circle = Region::circle(50.0, 50.0, 20.0).unwrap();
        assert_relative_eq!(circle.area(0.25).unwrap(), PI * 400.0, max_relative = 0.01);

        let ring = Region::annulus(50.0, 50.0, 10.0, 20.0).unwrap();
        assert_relative_eq!(ring.area(0.25).unwrap(), PI * 300.0, max_relative = 0.01);
    }

    #[test]
    fn test_area_errors_and_empty() {
        assert!(matches!(
            Region::universe().area(1.0),
            Err(RegionError::Unbounded { .. })
        ));
        assert!(Region::circle(0.0, 0.0, 1.0).unwrap().area(0.0).is_err());
        assert_eq!(Region::empty().area(1.0).unwrap(), 0.0);

        // Disjoint intersection has an empty extent
        let a = Region::circle(0.0, 0.0, 1.0).unwrap();
        let b = Region::circle(10.0, 0.0, 1.0).unwrap();
        assert_eq!(a.intersect(&b).extent(), Extent::Empty);
    }

    #[test]
    fn test_area_grid_is_shared_between_region_and_subset() {
        let ring = Region::annulus(33.3, 47.9, 4.0, 12.0).unwrap();
        let half = Region::polygon(vec![(0.0, 0.0), (33.3, 0.0), (33.3, 100.0), (0.0, 100.0)])
            .unwrap();
        let full_area = ring.area(1.0).unwrap();
        let clipped_area = ring.intersect(&half).area(1.0).unwrap();
        let rest_area = ring.subtract(&half).unwrap().area(1.0).unwrap();

        // Same sample points on both sides of the cut
        assert_relative_eq!(clipped_area + rest_area, full_area, epsilon = 1e-9);
    }

    #[test]
    fn test_from_entries_round_trip_and_malformed() {
        let ring = Region::annulus(0.0, 0.0, 1.0, 5.0).unwrap();
        let region = ring
            .subtract(&circles(&[(2.0, 0.0), (-2.0, 0.0)], 0.5))
            .unwrap();
        let rebuilt = Region::from_entries(region.entries().to_vec()).unwrap();
        assert_eq!(rebuilt, region);

        let mut bad = region.entries().to_vec();
        bad[0].logic = Logic::And;
        assert!(matches!(
            Region::from_entries(bad),
            Err(RegionError::MalformedRegion { .. })
        ));

        let mut restarted = region.entries().to_vec();
        restarted[2].logic = Logic::NoOp;
        assert!(Region::from_entries(restarted).is_err());

        assert!(Region::from_entries(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_and_binds_to_trailing_term() {
        // a | b & c  ==  a | (b & c)
        let a = RegionEntry::new(
            create_circle(0.0, 0.0, 1.0).unwrap(),
            Inclusion::Include,
            Logic::NoOp,
        );
        let b = RegionEntry::new(
            create_circle(10.0, 0.0, 3.0).unwrap(),
            Inclusion::Include,
            Logic::Or,
        );
        let c = RegionEntry::new(
            create_circle(12.0, 0.0, 3.0).unwrap(),
            Inclusion::Include,
            Logic::And,
        );
        let region = Region::from_entries(vec![a, b, c]).unwrap();

        assert!(region.contains(0.0, 0.0));
        assert!(region.contains(11.0, 0.0));
        assert!(!region.contains(8.0, 0.0));
    }

    #[test]
    fn test_json_round_trip_validates() {
        let region = Region::annulus(5.0, 5.0, 1.0, 3.0)
            .unwrap()
            .subtract(&Region::circle(6.0, 5.0, 0.5).unwrap())
            .unwrap();
        let json = serde_json::to_string(&region).unwrap();
        let back: Region = serde_json::from_str(&json).unwrap();
        assert_eq!(back, region);

        let invalid = r#"[{"shape":{"type":"Circle","x":0.0,"y":0.0,"radius":-1.0},"inclusion":"Include","logic":"NoOp"}]"#;
        assert!(serde_json::from_str::<Region>(invalid).is_err());
    }
}
