//! Multi-pass smoothing filter ("HydRun").
//!
//! Pass 1 filters the observed discharge; every later pass filters the
//! previous pass's output. Odd passes sweep forward (index 0 to n-1), even
//! passes sweep backward (n-1 to 0). Each sweep:
//!
//! ```text
//! B[start] = X[start]
//! B[i]     = min(k * B[prev] + (1 - k) * (X[i] + X[prev]) / 2, X[i])
//! ```
//!
//! where `X` is the sweep's input and `prev` is the neighbour already
//! visited in that sweep's direction. Since `X <= Q` after the first pass,
//! the clamp keeps every pass at or below the observed discharge.

use super::recursive::check_closed_unit;
use crate::error::{BaseflowError, Result};

const HYDRUN: &str = "HydRun";

pub fn validate_hydrun(k: f64, passes: usize) -> Result<()> {
    check_closed_unit(HYDRUN, "k", k)?;
    if passes == 0 {
        return Err(BaseflowError::invalid_parameter(
            HYDRUN,
            "passes",
            passes as f64,
            "[1, inf)",
        ));
    }
    Ok(())
}

/// Sweep direction of a single pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// Direction of 1-based pass number `pass`
    pub fn for_pass(pass: usize) -> Self {
        if pass % 2 == 1 {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }
}

/// One clamped smoothing sweep over `signal`
pub fn sweep(signal: &[f64], k: f64, direction: Direction) -> Vec<f64> {
    let n = signal.len();
    let mut out = signal.to_vec();
    if n < 2 {
        return out;
    }

    let smooth = |prev_b: f64, x: f64, prev_x: f64| {
        (k * prev_b + (1.0 - k) * (x + prev_x) / 2.0).min(x)
    };

    match direction {
        Direction::Forward => {
            for i in 1..n {
                out[i] = smooth(out[i - 1], signal[i], signal[i - 1]);
            }
        }
        Direction::Backward => {
            for i in (0..n - 1).rev() {
                out[i] = smooth(out[i + 1], signal[i], signal[i + 1]);
            }
        }
    }

    out
}

/// Run `passes` alternating sweeps, each feeding the next
pub fn hydrun(discharge: &[f64], k: f64, passes: usize) -> Result<Vec<f64>> {
    validate_hydrun(k, passes)?;
    if discharge.is_empty() {
        return Err(BaseflowError::EmptySeries);
    }

    let mut baseflow = discharge.to_vec();
    for pass in 1..=passes {
        baseflow = sweep(&baseflow, k, Direction::for_pass(pass));
    }
    Ok(baseflow)
}
