use crate::annulus::assemble_annulus;
use crate::classify::classify_events;
use crate::config::FixedCountsConfig;
use crate::error::{FixedBkgError, Result};
use crate::exclusion::{Exclusion, build_exclusion};
use crate::index::EventIndex;
use crate::radius::{HIGH_COUNT_FRACTION, SolvedRadius, solve_radius};
use crate::source::Source;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use skyreg::Region;
use tracing::{debug, info, warn};

/// Background region and radius search outcome for one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceResult {
    pub source: Source,

    /// Final background region
    pub region: Region,

    pub outer_radius: f64,

    /// The field of view was intersected into the region
    pub clipped: bool,

    /// Grid area in square pixels, measured only when a field of view was
    /// compared against the annulus
    pub area: Option<f64>,

    pub diagnostics: SolvedRadius,
}

impl SourceResult {
    pub fn index(&self) -> usize {
        self.source.index
    }

    pub fn inner_radius(&self) -> f64 {
        self.source.inner_radius
    }
}

/// Result of a fixed-counts run, one entry per input source in input order
#[derive(Debug, Clone, PartialEq)]
pub struct FixedCountsResult {
    pub sources: Vec<SourceResult>,

    /// Events read
    pub n_events: usize,

    /// Events outside every exclusion
    pub n_background: usize,
}

/// Compute fixed-counts background annuli for every source.
///
/// # Pipeline
/// 1. Exclusion region from all footprints and the extra exclusions
/// 2. Background = events inside the exclusion region
/// 3. Per source (in parallel): outer radius, then the annulus region
///
/// Diagnostics never fail the run; they are logged and returned per source.
///
/// # Errors
/// Configuration errors, invalid sources, non-finite event coordinates and
/// region failures of any source abort the whole run.
pub fn run_fixed_counts(
    sources: &[Source],
    events: &[(f64, f64)],
    extra_exclusions: Option<&[Region]>,
    fov: Option<&Region>,
    config: &FixedCountsConfig,
) -> Result<FixedCountsResult> {
    config.validate()?;
    for source in sources {
        source.validate()?;
    }
    validate_events(events)?;

    info!(
        "Fixed-counts background: {} sources, {} events, min_counts = {}",
        sources.len(),
        events.len(),
        config.min_counts
    );

    let exclusion = build_exclusion(sources, extra_exclusions)?;
    let background = classify_events(events, &exclusion.region);
    info!(
        "{} of {} events are background",
        background.len(),
        events.len()
    );

    let index = EventIndex::build(&background);
    let results = sources
        .par_iter()
        .map(|source| process_source(source, &index, &exclusion, fov, config))
        .collect::<Result<Vec<_>>>()?;

    Ok(FixedCountsResult {
        sources: results,
        n_events: events.len(),
        n_background: background.len(),
    })
}

/// Every event coordinate must be finite
fn validate_events(events: &[(f64, f64)]) -> Result<()> {
    match events
        .iter()
        .position(|&(x, y)| !x.is_finite() || !y.is_finite())
    {
        Some(i) => Err(FixedBkgError::invalid_input(format!(
            "event {} has non-finite coordinates ({}, {})",
            i + 1,
            events[i].0,
            events[i].1
        ))),
        None => Ok(()),
    }
}

fn process_source(
    source: &Source,
    index: &EventIndex,
    exclusion: &Exclusion,
    fov: Option<&Region>,
    config: &FixedCountsConfig,
) -> Result<SourceResult> {
    let solved = solve_radius(source, index, config)?;
    log_diagnostics(source, &solved, config);

    let assembled = assemble_annulus(source, solved.outer_radius, exclusion, fov, config)?;
    debug!(
        "Source {}: radii {:.3} - {:.3}, {} counts{}",
        source.index,
        source.inner_radius,
        solved.outer_radius,
        solved.enclosed_counts,
        if assembled.clipped { ", clipped" } else { "" }
    );

    Ok(SourceResult {
        source: source.clone(),
        region: assembled.region,
        outer_radius: solved.outer_radius,
        clipped: assembled.clipped,
        area: assembled.area,
        diagnostics: solved,
    })
}

fn log_diagnostics(source: &Source, solved: &SolvedRadius, config: &FixedCountsConfig) {
    if solved.insufficient_background {
        warn!(
            "Source {}: only {} background events for min_counts = {}",
            source.index, solved.n_background, config.min_counts
        );
    }
    if solved.high_count_fraction {
        warn!(
            "Source {}: min_counts is more than {:.0}% of the background, annuli of nearby sources will share events",
            source.index,
            HIGH_COUNT_FRACTION * 100.0
        );
    }
    if solved.clamped {
        warn!(
            "Source {}: outer radius capped at {} with {} of {} requested counts",
            source.index, solved.outer_radius, solved.enclosed_counts, config.min_counts
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_is_preserved() {
        let sources = Source::from_rows((0..40).map(|i| (i as f64 * 30.0, 0.0, 2.0)));
        let events: Vec<(f64, f64)> = (0..1200).map(|i| (i as f64, 7.0)).collect();
        let config = FixedCountsConfig {
            min_counts: 5,
            ..Default::default()
        };

        let result = run_fixed_counts(&sources, &events, None, None, &config).unwrap();
        assert_eq!(result.sources.len(), 40);
        for (i, source_result) in result.sources.iter().enumerate() {
            assert_eq!(source_result.index(), i + 1);
            assert!(source_result.outer_radius >= source_result.inner_radius());
        }
        assert_eq!(result.n_events, 1200);
    }

    #[test]
    fn test_invalid_config_fails_early() {
        let config = FixedCountsConfig {
            min_counts: 0,
            ..Default::default()
        };
        let err = run_fixed_counts(&[], &[], None, None, &config).unwrap_err();
        assert!(err.is_config_error());

        let bad_source = vec![Source::new(1, 0.0, 0.0, -2.0)];
        let err = run_fixed_counts(&bad_source, &[], None, None, &Default::default()).unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_non_finite_event_is_rejected() {
        let sources = vec![Source::new(1, 100.0, 100.0, 5.0)];
        let events = vec![
            (110.0, 100.0),
            (100.0, 120.0),
            (70.0, 100.0),
            (f64::NAN, f64::NAN),
        ];
        let config = FixedCountsConfig {
            min_counts: 2,
            ..Default::default()
        };

        let err = run_fixed_counts(&sources, &events, None, None, &config).unwrap_err();
        assert!(matches!(err, FixedBkgError::InvalidInput(ref msg) if msg.contains("event 4")));

        let events = vec![(110.0, 100.0), (f64::INFINITY, 3.0)];
        let err = run_fixed_counts(&sources, &events, None, None, &config).unwrap_err();
        assert!(matches!(err, FixedBkgError::InvalidInput(ref msg) if msg.contains("event 2")));
    }

    #[test]
    fn test_area_only_measured_with_fov() {
        let sources = vec![Source::new(1, 100.0, 100.0, 5.0)];
        let events = vec![(110.0, 100.0), (100.0, 120.0), (70.0, 100.0)];
        let config = FixedCountsConfig {
            min_counts: 2,
            ..Default::default()
        };

        let result = run_fixed_counts(&sources, &events, None, None, &config).unwrap();
        assert_eq!(result.sources[0].area, None);

        let fov = Region::polygon(vec![(0.0, 0.0), (500.0, 0.0), (500.0, 500.0), (0.0, 500.0)])
            .unwrap();
        let result = run_fixed_counts(&sources, &events, None, Some(&fov), &config).unwrap();
        let bkg = &result.sources[0];
        assert!(!bkg.clipped);
        assert_eq!(bkg.area, Some(bkg.region.area(1.0).unwrap()));
    }

    #[test]
    fn test_no_sources() {
        let result =
            run_fixed_counts(&[], &[(1.0, 1.0)], None, None, &FixedCountsConfig::default())
                .unwrap();
        assert!(result.sources.is_empty());
        assert_eq!(result.n_background, 1);
    }
}
