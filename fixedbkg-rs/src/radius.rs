use crate::config::FixedCountsConfig;
use crate::error::{FixedBkgError, Result};
use crate::index::EventIndex;
use crate::source::Source;
use serde::{Deserialize, Serialize};

/// Ratio of requested counts to available background above which the
/// backgrounds of nearby sources are no longer independent
pub const HIGH_COUNT_FRACTION: f64 = 0.1;

/// Outer radius of one source plus the diagnostics of its search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolvedRadius {
    pub outer_radius: f64,

    /// Fewer background events than requested were available
    pub insufficient_background: bool,

    /// `min_counts / n_background` exceeds [`HIGH_COUNT_FRACTION`]
    pub high_count_fraction: bool,

    /// The outer radius was limited by `max_radius`
    pub clamped: bool,

    /// Background events within `outer_radius` of the source centre
    pub enclosed_counts: usize,

    pub n_background: usize,
}

/// Smallest radius around the source whose closed disc holds `min_counts`
/// background events, capped by `max_radius`.
///
/// # Algorithm
/// - candidate = distance of the `min_counts`-th nearest background event
/// - with fewer events than requested, the farthest event is used instead
/// - a candidate beyond `max_radius` is clamped to it
/// - without any background the radius is `max_radius`, or the inner radius
///   when no cap is set
///
/// # Errors
/// `FixedBkgError::MaxRadiusBelowInner` when the cap has to be applied but is
/// smaller than the source's inner radius.
pub fn solve_radius(
    source: &Source,
    background: &EventIndex,
    config: &FixedCountsConfig,
) -> Result<SolvedRadius> {
    let k = config.min_counts;
    let m = background.len();
    let inner = source.inner_radius;

    let insufficient_background = m < k;
    let candidate = if insufficient_background {
        background.farthest_distance(source.x, source.y)
    } else {
        background.kth_nearest_distance(source.x, source.y, k)
    };

    let apply_cap = |max_radius: f64| -> Result<f64> {
        if max_radius < inner {
            return Err(FixedBkgError::MaxRadiusBelowInner {
                index: source.index,
                max_radius,
                inner_radius: inner,
            });
        }
        Ok(max_radius)
    };

    let (outer, clamped) = match (candidate, config.max_radius) {
        (Some(radius), Some(max_radius)) if radius > max_radius => {
            (apply_cap(max_radius)?, true)
        }
        (Some(radius), _) => (radius, false),
        (None, Some(max_radius)) => (apply_cap(max_radius)?, true),
        (None, None) => (inner, false),
    };
    // Indexes built from unclassified events can hold points inside the footprint
    let outer_radius = outer.max(inner);

    Ok(SolvedRadius {
        outer_radius,
        insufficient_background,
        high_count_fraction: m == 0 || k as f64 / m as f64 > HIGH_COUNT_FRACTION,
        clamped,
        enclosed_counts: background.count_within(source.x, source.y, outer_radius),
        n_background: m,
    })
}
