use approx::assert_relative_eq;
use force_plot::scale::{Domain, LinearScale, normalize};

#[test]
fn normalize_maps_endpoints_onto_range() {
    assert_relative_eq!(normalize(-10.0, -10.0, 50.0, 600.0), 0.0);
    assert_relative_eq!(normalize(50.0, -10.0, 50.0, 600.0), 600.0);
    assert_relative_eq!(normalize(20.0, -10.0, 50.0, 600.0), 300.0);
}

#[test]
fn normalize_is_monotonic() {
    let domain = Domain::new(-10.0, 50.0);
    let mut previous = f64::NEG_INFINITY;
    for step in 0..=60 {
        let value = -10.0 + f64::from(step);
        let mapped = domain.normalize(value, 480.0);
        assert!(mapped > previous, "{value} mapped to {mapped}, not above {previous}");
        previous = mapped;
    }
}

#[test]
fn degenerate_domain_does_not_produce_nan() {
    let domain = Domain::new(4.0, 4.0);
    assert!(domain.is_degenerate());
    assert!(domain.normalize(4.0, 100.0).is_finite());
    assert!(domain.normalize(9.0, 100.0).is_finite());
}

#[test]
fn non_negative_data_pads_from_zero() {
    let padded = Domain::from_values([1.0, 3.0, 5.0, 7.0]).padded();
    assert_eq!(padded.raw, Domain::new(0.0, 7.0));
    assert_eq!(padded.step, 1.0);
    assert_eq!(padded.bounds, Domain::new(0.0, 8.0));

    let ticks = padded.ticks();
    assert_eq!(ticks.len(), 9);
    assert!(ticks.iter().all(|&tick| tick >= 0.0));
}

#[test]
fn ticks_are_symmetric_around_zero() {
    let padded = Domain::new(-40.0, 40.0).padded();
    assert_eq!(padded.bounds, Domain::new(-50.0, 50.0));

    let ticks = padded.ticks();
    assert_eq!(ticks.iter().filter(|&&tick| tick == 0.0).count(), 1);
    for &tick in &ticks {
        assert!(ticks.contains(&-tick), "missing mirror of {tick}");
        assert!(tick >= padded.bounds.min && tick <= padded.bounds.max);
    }
    assert_eq!(ticks.len(), 11);
}

#[test]
fn lopsided_domain_mirrors_ticks_that_fit() {
    let padded = Domain::new(-4.0, 40.0).padded();
    assert_eq!(padded.step, 5.0);
    assert_eq!(padded.bounds, Domain::new(-9.0, 45.0));

    let ticks = padded.ticks();
    assert!(ticks.contains(&-5.0));
    assert!(!ticks.contains(&-10.0));
    for &tick in &ticks {
        if -tick >= padded.bounds.min {
            assert!(ticks.contains(&-tick), "missing mirror of {tick}");
        }
    }
    assert_eq!(ticks.iter().copied().fold(f64::NEG_INFINITY, f64::max), 45.0);
}

#[test]
fn linear_scale_uses_range_midpoint_for_a_single_value() {
    let scale = LinearScale::from_extent([5.0, 5.0], (3.0, 15.0));
    assert_relative_eq!(scale.scale(5.0), 9.0);

    let scale = LinearScale::from_extent([1.0, 11.0, 6.0], (3.0, 15.0));
    assert_relative_eq!(scale.scale(1.0), 3.0);
    assert_relative_eq!(scale.scale(11.0), 15.0);
    assert_relative_eq!(scale.scale(6.0), 9.0);
}
