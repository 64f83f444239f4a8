//! Curve Tests
//!
//! Definition-time validation and evaluation of piecewise-linear curves.

use impulse_engine::{evaluate, Curve, CurveError};

const EPSILON: f64 = 1e-12;

fn sample_points() -> Vec<f64> {
    (0..=200).map(|i| -0.5 + i as f64 * 0.01).collect()
}

/// Every curve the landing page uses, plus a few irregular ones.
fn curves() -> Vec<Curve> {
    [
        vec![(0.0, 0.65), (0.33, 0.95), (0.66, 1.2), (1.0, 1.3)],
        vec![(0.0, 0.35), (0.4, 0.6), (0.6, 0.95), (1.0, 0.8)],
        vec![(0.25, 0.0), (0.5, 1.0), (0.8, 0.6)],
        vec![(0.6, 0.0), (0.8, 1.0)],
        vec![(0.0, 1.0), (0.18, 1.0), (0.3, 0.0)],
        vec![(0.1, -3.0), (0.1, 5.0), (0.7, 5.0), (0.9, -1.0)],
    ]
    .iter()
    .map(|pairs| Curve::from_pairs(pairs).unwrap())
    .collect()
}

#[test]
fn clamps_below_first_breakpoint() {
    for curve in curves() {
        let first = curve.breakpoints()[0];
        for p in sample_points().into_iter().filter(|p| *p < first.input) {
            assert_eq!(curve.evaluate(p), first.output, "progress {}", p);
        }
    }
}

#[test]
fn clamps_above_last_breakpoint() {
    for curve in curves() {
        let last = *curve.breakpoints().last().unwrap();
        for p in sample_points().into_iter().filter(|p| *p >= last.input) {
            assert_eq!(curve.evaluate(p), last.output, "progress {}", p);
        }
    }
}

#[test]
fn first_breakpoint_is_exact() {
    let curve = Curve::from_pairs(&[(0.25, 0.0), (0.5, 1.0), (0.8, 0.6)]).unwrap();
    assert_eq!(curve.evaluate(0.25), 0.0);
    assert_eq!(curve.evaluate(0.0), 0.0);
}

#[test]
fn interior_values_never_overshoot() {
    for curve in curves() {
        for pair in curve.breakpoints().windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if hi.input <= lo.input {
                continue;
            }
            let min = lo.output.min(hi.output);
            let max = lo.output.max(hi.output);
            for step in 1..50 {
                let p = lo.input + (hi.input - lo.input) * step as f64 / 50.0;
                let v = curve.evaluate(p);
                assert!(
                    v >= min - EPSILON && v <= max + EPSILON,
                    "{} outside [{}, {}] at {}",
                    v,
                    min,
                    max,
                    p
                );
            }
        }
    }
}

#[test]
fn core_scale_midway_through_first_segment() {
    let curve = Curve::from_pairs(&[(0.0, 0.65), (0.33, 0.95), (0.66, 1.2), (1.0, 1.3)]).unwrap();
    let v = evaluate(&curve, 0.165);
    assert!((v - 0.80).abs() < 1e-9, "got {}", v);
}

#[test]
fn beat_fade_out_halfway() {
    let curve = Curve::from_pairs(&[(0.0, 1.0), (0.18, 1.0), (0.3, 0.0)]).unwrap();
    let v = curve.evaluate(0.24);
    assert!((v - 0.5).abs() < 1e-9, "got {}", v);
}

#[test]
fn duplicate_inputs_take_last_defined() {
    let curve = Curve::from_pairs(&[(0.6, 0.0), (0.6, 1.0)]).unwrap();
    let v = curve.evaluate(0.6);
    assert!(!v.is_nan());
    assert_eq!(v, 1.0);
}

#[test]
fn duplicate_inputs_in_the_middle_step() {
    let curve = Curve::from_pairs(&[(0.0, 0.0), (0.5, 0.2), (0.5, 0.8), (1.0, 1.0)]).unwrap();
    assert_eq!(curve.evaluate(0.5), 0.8);
    assert!((curve.evaluate(0.25) - 0.1).abs() < EPSILON);
    assert!((curve.evaluate(0.75) - 0.9).abs() < EPSILON);
}

#[test]
fn unsorted_inputs_fail_at_construction() {
    let err = Curve::from_pairs(&[(0.5, 0.0), (0.2, 1.0)]).unwrap_err();
    assert_eq!(
        err,
        CurveError::Unsorted {
            index: 1,
            previous: 0.5,
            input: 0.2
        }
    );
}

#[test]
fn too_few_breakpoints_fail() {
    assert_eq!(
        Curve::from_pairs(&[]).unwrap_err(),
        CurveError::TooFewBreakpoints(0)
    );
    assert_eq!(
        Curve::from_pairs(&[(0.3, 1.0)]).unwrap_err(),
        CurveError::TooFewBreakpoints(1)
    );
}

#[test]
fn non_finite_breakpoints_fail() {
    assert!(matches!(
        Curve::from_pairs(&[(0.0, 0.0), (f64::NAN, 1.0)]),
        Err(CurveError::NonFinite { index: 1, .. })
    ));
    assert!(matches!(
        Curve::from_pairs(&[(0.0, f64::INFINITY), (1.0, 1.0)]),
        Err(CurveError::NonFinite { index: 0, .. })
    ));
}

#[test]
fn error_messages_are_descriptive() {
    let err = Curve::from_pairs(&[(0.5, 0.0), (0.2, 1.0)]).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("0.2") && msg.contains("0.5"), "{}", msg);
}

#[test]
fn nan_progress_holds_first_output() {
    let curve = Curve::from_pairs(&[(0.0, 0.35), (1.0, 0.8)]).unwrap();
    assert_eq!(curve.evaluate(f64::NAN), 0.35);
}

#[test]
fn domain_spans_first_to_last_input() {
    let curve = Curve::from_pairs(&[(0.25, 0.0), (0.5, 1.0), (0.8, 0.6)]).unwrap();
    assert_eq!(curve.domain(), (0.25, 0.8));
}
