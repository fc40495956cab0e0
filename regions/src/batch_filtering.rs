//! Batch membership operations for regions
//!
//! Provides CPU-parallel point-in-region queries over large event lists.
//! Uses Rayon for parallelization; results keep the input order.

use crate::region::Region;
use rayon::prelude::*;

/// Batch point-in-region query, one flag per input point
pub fn contains_batch(region: &Region, points: &[(f64, f64)]) -> Vec<bool> {
    points
        .par_iter()
        .map(|&(x, y)| region.contains(x, y))
        .collect()
}

/// Points that fall inside the region, in input order
pub fn filter_points(region: &Region, points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    points
        .par_iter()
        .filter(|&&(x, y)| region.contains(x, y))
        .copied()
        .collect()
}

/// Number of points inside the region
pub fn count_inside(region: &Region, points: &[(f64, f64)]) -> usize {
    points
        .par_iter()
        .filter(|&&(x, y)| region.contains(x, y))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_batch() {
        let square = Region::polygon(vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)])
            .unwrap();

        let points = vec![
            (5.0, 5.0),   // Inside
            (15.0, 5.0),  // Outside
            (5.0, 15.0),  // Outside
            (-5.0, 5.0),  // Outside
            (10.0, 10.0), // On corner (inside)
        ];

        let results = contains_batch(&square, &points);
        assert_eq!(results, vec![true, false, false, false, true]);
    }

    #[test]
    fn test_filter_points_preserves_order() {
        let swiss = Region::universe()
            .subtract(&Region::circle(0.0, 0.0, 1.0).unwrap())
            .unwrap();
        let points: Vec<(f64, f64)> = (0..1000).map(|i| ((i % 7) as f64 - 3.0, i as f64 * 0.001)).collect();

        let kept = filter_points(&swiss, &points);
        let expected: Vec<(f64, f64)> = points
            .iter()
            .copied()
            .filter(|&(x, y)| x.hypot(y) > 1.0)
            .collect();
        assert_eq!(kept, expected);
        assert_eq!(count_inside(&swiss, &points), expected.len());
    }
}
