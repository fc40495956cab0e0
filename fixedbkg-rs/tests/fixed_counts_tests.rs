//! End-to-end fixed-counts tests
//!
//! Small hand-checked scenarios first, then properties that have to hold on
//! random event fields.

use approx::assert_relative_eq;
use fixedbkg_rs::{
    FixedBkgError, FixedCountsConfig, Source, assemble_annulus, build_exclusion, classify_events,
    run_fixed_counts,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use skyreg::{Region, Shape, create_circle, parse_region};

/// Background events at distances 10, 20 and 30 from (100, 100)
fn scenario_events() -> Vec<(f64, f64)> {
    vec![(110.0, 100.0), (100.0, 120.0), (70.0, 100.0)]
}

fn scenario_source() -> Vec<Source> {
    vec![Source::new(1, 100.0, 100.0, 5.0)]
}

fn config(min_counts: usize, max_radius: Option<f64>) -> FixedCountsConfig {
    FixedCountsConfig {
        min_counts,
        max_radius,
        ..Default::default()
    }
}

fn random_field(n_sources: usize, n_events: usize, seed: u64) -> (Vec<Source>, Vec<(f64, f64)>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let sources = Source::from_rows((0..n_sources).map(|_| {
        (
            rng.random_range(50.0..350.0),
            rng.random_range(50.0..350.0),
            rng.random_range(1.0..8.0),
        )
    }));
    let events = (0..n_events)
        .map(|_| (rng.random_range(0.0..400.0), rng.random_range(0.0..400.0)))
        .collect();
    (sources, events)
}

#[test]
fn test_scenario_kth_nearest_radius() {
    let result =
        run_fixed_counts(&scenario_source(), &scenario_events(), None, None, &config(2, None))
            .unwrap();
    let bkg = &result.sources[0];

    assert_relative_eq!(bkg.outer_radius, 20.0);
    assert!(!bkg.diagnostics.clamped);
    assert_eq!(bkg.diagnostics.enclosed_counts, 2);
}

#[test]
fn test_scenario_cap_applies() {
    let result = run_fixed_counts(
        &scenario_source(),
        &scenario_events(),
        None,
        None,
        &config(2, Some(15.0)),
    )
    .unwrap();

    assert_relative_eq!(result.sources[0].outer_radius, 15.0);
    assert!(result.sources[0].diagnostics.clamped);
}

#[test]
fn test_scenario_cap_below_inner_radius_fails() {
    let err = run_fixed_counts(
        &scenario_source(),
        &scenario_events(),
        None,
        None,
        &config(2, Some(3.0)),
    )
    .unwrap_err();

    assert!(matches!(err, FixedBkgError::MaxRadiusBelowInner { .. }));
}

#[test]
fn test_scenario_empty_extra_exclusion_changes_nothing() {
    let plain =
        run_fixed_counts(&scenario_source(), &scenario_events(), None, None, &config(2, None))
            .unwrap();
    let extras = vec![Region::empty()];
    let with_empty = run_fixed_counts(
        &scenario_source(),
        &scenario_events(),
        Some(&extras),
        None,
        &config(2, None),
    )
    .unwrap();

    assert_eq!(plain, with_empty);
}

#[test]
fn test_scenario_fov_containing_annulus_is_unclipped() {
    let fov = parse_region("rotbox(100,100,400,400,0)").unwrap();
    let result = run_fixed_counts(
        &scenario_source(),
        &scenario_events(),
        None,
        Some(&fov),
        &config(2, None),
    )
    .unwrap();
    let bkg = &result.sources[0];

    assert!(!bkg.clipped);
    assert!(!bkg.region.shapes().any(|s| matches!(s, Shape::Rectangle(_))));
}

#[test]
fn test_extra_exclusion_removes_events_and_carves_annulus() {
    let extras = vec![parse_region("circle(110,100,3)").unwrap()];
    let result = run_fixed_counts(
        &scenario_source(),
        &scenario_events(),
        Some(&extras),
        None,
        &config(2, None),
    )
    .unwrap();
    let bkg = &result.sources[0];

    // The event at distance 10 is excluded, so the 2nd nearest is at 30
    assert_eq!(result.n_background, 2);
    assert_relative_eq!(bkg.outer_radius, 30.0);
    assert!(!bkg.region.contains(110.0, 100.0));
    assert!(!bkg.diagnostics.insufficient_background);
}

#[test]
fn test_repair_keeps_neighbour_circles_only() {
    let sources = Source::from_rows([(100.0, 100.0, 5.0), (115.0, 100.0, 4.0)]);
    let result =
        run_fixed_counts(&sources, &scenario_events(), None, None, &config(1, Some(25.0)))
            .unwrap();

    let own = |s: &Source| create_circle(s.x, s.y, s.inner_radius).unwrap();
    for (i, bkg) in result.sources.iter().enumerate() {
        let shapes: Vec<&Shape> = bkg.region.shapes().collect();
        assert!(!shapes.contains(&&own(&sources[i])), "source {}", i + 1);
        assert!(shapes.contains(&&own(&sources[1 - i])), "source {}", i + 1);
    }
}

#[test]
fn test_radius_invariants_on_random_field() {
    let (sources, events) = random_field(25, 5000, 3);
    let cap = 60.0;
    let result = run_fixed_counts(&sources, &events, None, None, &config(40, Some(cap))).unwrap();

    assert_eq!(result.sources.len(), sources.len());
    for bkg in &result.sources {
        assert!(bkg.outer_radius >= bkg.inner_radius());
        assert!(bkg.outer_radius <= cap);
        if !bkg.diagnostics.clamped {
            assert!(bkg.diagnostics.enclosed_counts >= 40);
        }
    }
}

#[test]
fn test_enclosed_counts_match_background_events() {
    let (sources, events) = random_field(10, 3000, 9);
    let exclusion = build_exclusion(&sources, None).unwrap();
    let background = classify_events(&events, &exclusion.region);
    let result = run_fixed_counts(&sources, &events, None, None, &config(25, None)).unwrap();

    assert_eq!(result.n_background, background.len());
    for bkg in &result.sources {
        let s = &bkg.source;
        let expected = background
            .iter()
            .filter(|&&(x, y)| s.distance_to(x, y) <= bkg.outer_radius)
            .count();
        assert_eq!(bkg.diagnostics.enclosed_counts, expected);
        assert!(expected >= 25);
    }
}

#[test]
fn test_classification_is_idempotent_on_random_field() {
    let (sources, events) = random_field(30, 4000, 17);
    let exclusion = build_exclusion(&sources, None).unwrap();

    let once = classify_events(&events, &exclusion.region);
    let twice = classify_events(&once, &exclusion.region);
    assert_eq!(once, twice);
}

#[test]
fn test_annulus_area_is_monotonic_in_outer_radius() {
    let (sources, _) = random_field(8, 0, 21);
    let exclusion = build_exclusion(&sources, None).unwrap();
    let config = FixedCountsConfig::default();
    let source = &sources[0];

    let mut last = 0.0;
    let mut outer = source.inner_radius;
    while outer < source.inner_radius + 80.0 {
        let area = assemble_annulus(source, outer, &exclusion, None, &config)
            .unwrap()
            .region
            .area(config.area_bin_size)
            .unwrap();
        assert!(area >= last, "area shrank at outer radius {}", outer);
        last = area;
        outer += 7.5;
    }
}

#[test]
fn test_region_files_round_trip_for_every_source() {
    let (sources, events) = random_field(5, 2000, 5);
    let result = run_fixed_counts(&sources, &events, None, None, &config(20, None)).unwrap();
    let dir = tempfile::tempdir().unwrap();

    for bkg in &result.sources {
        let path = dir.path().join(format!("src_{}_bkg.reg", bkg.index()));
        skyreg::write_region_file(&path, &bkg.region, skyreg::RegionFormat::Ascii).unwrap();
        let back = skyreg::read_region_file(&path).unwrap();
        assert_relative_eq!(back.area(1.0).unwrap(), bkg.region.area(1.0).unwrap());
    }
}
