//! Tests for the single-pass recursive filters

use super::{assert_close, synthetic_hydrograph};
use crate::error::BaseflowError;
use crate::filters::recursive::*;

#[test]
fn test_lyne_hollick_recurrence() {
    let q = [10.0, 8.0, 6.0];
    let b = lyne_hollick(&q, 0.925).unwrap();

    assert_eq!(b[0], 10.0);
    // 8 - (0.925 * 0 + 0.9625 * -2)
    assert_close(b[1], 9.925, 1e-9);
    // 6 - (0.925 * (8 - 9.925) + 0.9625 * -2)
    assert_close(b[2], 9.705625, 1e-9);
}

#[test]
fn test_lyne_hollick_may_exceed_discharge() {
    let q = [10.0, 8.0, 6.0];
    let b = lyne_hollick(&q, 0.925).unwrap();
    assert!(b[2] > q[2]);
}

#[test]
fn test_lyne_hollick_rejects_alpha_above_one() {
    let result = lyne_hollick(&[10.0, 8.0], 1.5);
    match result {
        Err(BaseflowError::InvalidParameter {
            parameter, value, ..
        }) => {
            assert_eq!(parameter, "alpha");
            assert_eq!(value, 1.5);
        }
        other => panic!("expected InvalidParameter, got {other:?}"),
    }
}

#[test]
fn test_chapman_recurrence() {
    let alpha = 0.925;
    let q = [10.0, 8.0, 6.0];
    let b = chapman(&q, alpha).unwrap();

    let carry = (3.0 * alpha - 1.0) / (3.0 - alpha);
    let gain = (1.0 - alpha) / (3.0 - alpha);
    let b1 = carry * 10.0 + gain * 18.0;
    let b2 = carry * b1 + gain * 14.0;

    assert_eq!(b[0], 10.0);
    assert_close(b[1], b1, 1e-12);
    assert_close(b[2], b2, 1e-12);
}

#[test]
fn test_eckhardt_recession_scenario() {
    let q = [10.0, 8.0, 6.0, 5.0, 4.0, 3.0];
    let b = eckhardt(&q, 0.8, 0.6).unwrap();

    let expected = [10.0, 8.0, 6.308, 5.0, 4.0, 3.0];
    for (actual, expected) in b.iter().zip(expected) {
        assert_close(*actual, expected, 1e-2);
    }
}

#[test]
fn test_eckhardt_open_interval_bounds() {
    assert!(eckhardt(&[1.0, 2.0], 0.0, 0.5).is_err());
    assert!(eckhardt(&[1.0, 2.0], 1.0, 0.5).is_err());
    assert!(eckhardt(&[1.0, 2.0], 0.5, 0.0).is_err());
    assert!(eckhardt(&[1.0, 2.0], 0.5, 1.0).is_err());
    assert!(eckhardt(&[1.0, 2.0], 0.5, 0.5).is_ok());
}

#[test]
fn test_eckhardt_never_exceeds_discharge() {
    let q = synthetic_hydrograph(365);
    let b = eckhardt(&q, 0.98, 0.8).unwrap();
    for (t, (b, q)) in b.iter().zip(&q).enumerate() {
        assert!(b <= q, "B[{t}] = {b} exceeds Q[{t}] = {q}");
    }
}

#[test]
fn test_chapman_maxwell_scenario() {
    let q = [10.0, 8.0, 6.0];
    let b = chapman_maxwell(&q, 0.9).unwrap();
    let quick = clamped_quickflow(&q, &b);

    assert_eq!(b[0], 10.0);
    assert_close(b[1], (1.0 / 1.1) * 10.0 + (0.1 / 1.1) * 8.0, 1e-12);
    assert_close(b[1], 9.818, 1e-3);
    assert_eq!(quick[1], 0.0);
}

#[test]
fn test_chapman_maxwell_quickflow_is_non_negative() {
    let q = synthetic_hydrograph(365);
    let b = chapman_maxwell(&q, 0.7).unwrap();
    let quick = clamped_quickflow(&q, &b);

    assert_eq!(quick.len(), q.len());
    assert!(quick.iter().all(|&v| v >= 0.0));
    // The split Q - quickflow is bounded by the observed discharge
    for ((q, quick), b) in q.iter().zip(&quick).zip(&b) {
        assert!(q - quick <= *q);
        assert_close(q - quick, b.min(*q), 1e-9);
    }
}

#[test]
fn test_boughton_recurrence() {
    let b = boughton(&[10.0, 8.0], 0.9, 0.1).unwrap();
    assert_close(b[1], (0.9 / 1.1) * 10.0 + (0.1 / 1.1) * 8.0, 1e-12);
}

#[test]
fn test_boughton_rejects_negative_c() {
    let result = boughton(&[10.0, 8.0], 0.9, -0.1);
    assert!(matches!(result, Err(BaseflowError::InvalidParameter { .. })));
}

#[test]
fn test_furey_gupta_recurrence() {
    let b = furey_gupta(&[10.0, 8.0, 6.0], 0.5, 1.0, 0.5).unwrap();
    assert_eq!(b, vec![10.0, 5.0, 3.25]);
}

#[test]
fn test_furey_gupta_requires_positive_c1() {
    assert!(furey_gupta(&[10.0, 8.0], 0.5, 0.0, 0.5).is_err());
    assert!(furey_gupta(&[10.0, 8.0], 1.2, 1.0, 0.5).is_err());
}

#[test]
fn test_empty_series_is_an_error_for_every_filter() {
    let empty: [f64; 0] = [];
    assert!(matches!(lyne_hollick(&empty, 0.9), Err(BaseflowError::EmptySeries)));
    assert!(matches!(chapman(&empty, 0.9), Err(BaseflowError::EmptySeries)));
    assert!(matches!(eckhardt(&empty, 0.9, 0.5), Err(BaseflowError::EmptySeries)));
    assert!(matches!(chapman_maxwell(&empty, 0.9), Err(BaseflowError::EmptySeries)));
    assert!(matches!(boughton(&empty, 0.9, 0.1), Err(BaseflowError::EmptySeries)));
    assert!(matches!(furey_gupta(&empty, 0.5, 1.0, 1.0), Err(BaseflowError::EmptySeries)));
}

#[test]
fn test_single_value_series_is_returned_unchanged() {
    let q = [42.0];
    assert_eq!(lyne_hollick(&q, 0.9).unwrap(), vec![42.0]);
    assert_eq!(chapman(&q, 0.9).unwrap(), vec![42.0]);
    assert_eq!(eckhardt(&q, 0.9, 0.5).unwrap(), vec![42.0]);
    assert_eq!(chapman_maxwell(&q, 0.9).unwrap(), vec![42.0]);
    assert_eq!(boughton(&q, 0.9, 0.1).unwrap(), vec![42.0]);
    assert_eq!(furey_gupta(&q, 0.5, 1.0, 1.0).unwrap(), vec![42.0]);
}

#[test]
fn test_invalid_parameter_checked_before_empty_series() {
    let empty: [f64; 0] = [];
    assert!(matches!(
        chapman(&empty, -0.1),
        Err(BaseflowError::InvalidParameter { .. })
    ));
}

#[test]
fn test_nan_parameter_is_rejected() {
    assert!(check_closed_unit("Chapman", "alpha", f64::NAN).is_err());
    assert!(check_open_unit("Eckhardt", "alpha", f64::NAN).is_err());
    assert!(check_non_negative("Boughton", "c", f64::INFINITY).is_err());
}
