//! Single-pass first-order baseflow filters.
//!
//! Each function validates its coefficients, seeds `B[0] = Q[0]` and then
//! walks the series once, so step `t` only sees `B[t-1]`, `Q[t]` and
//! `Q[t-1]`.

use crate::error::{BaseflowError, Result};

const LYNE_HOLLICK: &str = "Lyne_Hollick";
const CHAPMAN: &str = "Chapman";
const ECKHARDT: &str = "Eckhardt";
const CHAPMAN_MAXWELL: &str = "Chapman_Maxwell";
const BOUGHTON: &str = "Boughton";
const FUREY_GUPTA: &str = "Furey_Gupta";

// ---------------------------------------------------------------------------
// Domain checks
// ---------------------------------------------------------------------------

/// `value` must lie in [0, 1]
pub fn check_closed_unit(filter: &str, parameter: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(BaseflowError::invalid_parameter(
            filter, parameter, value, "[0, 1]",
        ))
    }
}

/// `value` must lie in (0, 1)
pub fn check_open_unit(filter: &str, parameter: &str, value: f64) -> Result<()> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(BaseflowError::invalid_parameter(
            filter, parameter, value, "(0, 1)",
        ))
    }
}

pub fn check_non_negative(filter: &str, parameter: &str, value: f64) -> Result<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(BaseflowError::invalid_parameter(
            filter, parameter, value, "[0, inf)",
        ))
    }
}

pub fn check_positive(filter: &str, parameter: &str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(BaseflowError::invalid_parameter(
            filter, parameter, value, "(0, inf)",
        ))
    }
}

// ---------------------------------------------------------------------------
// Recurrence driver
// ---------------------------------------------------------------------------

/// Seed `B[0] = Q[0]` and fill `B[t] = step(t, B[t-1])` for `t >= 1`
pub(crate) fn seeded_recurrence(
    discharge: &[f64],
    mut step: impl FnMut(usize, f64) -> f64,
) -> Result<Vec<f64>> {
    let first = *discharge.first().ok_or(BaseflowError::EmptySeries)?;

    let mut baseflow = Vec::with_capacity(discharge.len());
    baseflow.push(first);

    let mut previous = first;
    for t in 1..discharge.len() {
        previous = step(t, previous);
        baseflow.push(previous);
    }

    Ok(baseflow)
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Lyne & Hollick (1979) one-parameter filter. Not bounded by `Q`.
pub fn lyne_hollick(discharge: &[f64], alpha: f64) -> Result<Vec<f64>> {
    check_closed_unit(LYNE_HOLLICK, "alpha", alpha)?;

    let half_gain = (1.0 + alpha) / 2.0;
    seeded_recurrence(discharge, |t, prev_b| {
        let (q, prev_q) = (discharge[t], discharge[t - 1]);
        q - (alpha * (prev_q - prev_b) + half_gain * (q - prev_q))
    })
}

/// Chapman (1991) filter. Not bounded by `Q`.
pub fn chapman(discharge: &[f64], alpha: f64) -> Result<Vec<f64>> {
    check_closed_unit(CHAPMAN, "alpha", alpha)?;

    let carry = (3.0 * alpha - 1.0) / (3.0 - alpha);
    let gain = (1.0 - alpha) / (3.0 - alpha);
    seeded_recurrence(discharge, |t, prev_b| {
        carry * prev_b + gain * (discharge[t] + discharge[t - 1])
    })
}

/// Eckhardt (2005) two-parameter filter.
///
/// Each step is capped at the observed discharge and the capped value is
/// carried into the next step, so `B[t] <= Q[t]` for every `t`.
pub fn eckhardt(discharge: &[f64], alpha: f64, bfi_max: f64) -> Result<Vec<f64>> {
    check_open_unit(ECKHARDT, "alpha", alpha)?;
    check_open_unit(ECKHARDT, "bfi_max", bfi_max)?;

    let denominator = 1.0 - alpha * bfi_max;
    let carry = (1.0 - bfi_max) * alpha / denominator;
    let gain = (1.0 - alpha) * bfi_max / denominator;
    seeded_recurrence(discharge, |t, prev_b| {
        (carry * prev_b + gain * discharge[t]).min(discharge[t])
    })
}

/// Chapman & Maxwell (1996) filter. Baseflow itself is unclamped; see
/// [`clamped_quickflow`] for the bounded split.
pub fn chapman_maxwell(discharge: &[f64], k: f64) -> Result<Vec<f64>> {
    check_closed_unit(CHAPMAN_MAXWELL, "k", k)?;

    let carry = 1.0 / (2.0 - k);
    let gain = (1.0 - k) / (2.0 - k);
    seeded_recurrence(discharge, |t, prev_b| carry * prev_b + gain * discharge[t])
}

/// `max(0, Q[t] - B[t])` for aligned slices
pub fn clamped_quickflow(discharge: &[f64], baseflow: &[f64]) -> Vec<f64> {
    discharge
        .iter()
        .zip(baseflow)
        .map(|(q, b)| (q - b).max(0.0))
        .collect()
}

/// Boughton (1993) two-parameter filter
pub fn boughton(discharge: &[f64], k: f64, c: f64) -> Result<Vec<f64>> {
    check_closed_unit(BOUGHTON, "k", k)?;
    check_non_negative(BOUGHTON, "c", c)?;

    let carry = k / (1.0 + c);
    let gain = c / (1.0 + c);
    seeded_recurrence(discharge, |t, prev_b| carry * prev_b + gain * discharge[t])
}

/// Furey & Gupta (2001) physically based filter.
///
/// `c1` and `c3` are the catchment's surface-runoff and recharge
/// coefficients; only their ratio enters the recurrence.
pub fn furey_gupta(discharge: &[f64], gamma: f64, c1: f64, c3: f64) -> Result<Vec<f64>> {
    check_closed_unit(FUREY_GUPTA, "gamma", gamma)?;
    check_positive(FUREY_GUPTA, "c1", c1)?;
    check_non_negative(FUREY_GUPTA, "c3", c3)?;

    let ratio = c3 / c1;
    seeded_recurrence(discharge, |t, prev_b| {
        (1.0 - gamma) * prev_b + gamma * ratio * (discharge[t - 1] - prev_b)
    })
}
