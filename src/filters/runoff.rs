//! TR-55 curve-number separation.
//!
//! Direct runoff for each step comes from the SCS curve-number equation
//! applied to that step's precipitation; baseflow is what remains of the
//! observed discharge. Precipitation and discharge share the unit system
//! the curve number was calibrated in (inches).

use super::recursive::seeded_recurrence;
use crate::error::{BaseflowError, Result};

const TR55: &str = "TR55";

/// Check the curve number and optional initial abstraction override
pub fn validate_tr55(curve_number: f64, initial_abstraction: Option<f64>) -> Result<()> {
    if !(curve_number > 0.0 && curve_number <= 100.0) {
        return Err(BaseflowError::invalid_parameter(
            TR55,
            "curve_number",
            curve_number,
            "(0, 100]",
        ));
    }
    if let Some(ia) = initial_abstraction {
        if !(ia >= 0.0 && ia.is_finite()) {
            return Err(BaseflowError::invalid_parameter(
                TR55,
                "initial_abstraction",
                ia,
                "[0, inf)",
            ));
        }
    }
    Ok(())
}

/// Potential maximum retention `S = 1000 / CN - 10`
pub fn potential_retention(curve_number: f64) -> f64 {
    1000.0 / curve_number - 10.0
}

/// Default initial abstraction `Ia = 200 / CN - 2` (that is, `0.2 S`)
pub fn default_initial_abstraction(curve_number: f64) -> f64 {
    200.0 / curve_number - 2.0
}

/// SCS direct runoff for one precipitation depth; zero until `P` exceeds `Ia`
pub fn direct_runoff(precipitation: f64, initial_abstraction: f64, retention: f64) -> f64 {
    let excess = precipitation - initial_abstraction;
    if excess <= 0.0 {
        0.0
    } else {
        excess * excess / (excess + retention)
    }
}

/// `B[t] = Q[t] - runoff(P[t])` for `t >= 1`, `B[0] = Q[0]`
pub fn tr55(
    discharge: &[f64],
    precipitation: &[f64],
    curve_number: f64,
    initial_abstraction: Option<f64>,
) -> Result<Vec<f64>> {
    validate_tr55(curve_number, initial_abstraction)?;

    if discharge.len() != precipitation.len() {
        return Err(BaseflowError::column_mismatch(
            "Discharge",
            discharge.len(),
            "Precipitation",
            precipitation.len(),
        ));
    }

    let retention = potential_retention(curve_number);
    let ia = initial_abstraction.unwrap_or_else(|| default_initial_abstraction(curve_number));

    seeded_recurrence(discharge, |t, _| {
        discharge[t] - direct_runoff(precipitation[t], ia, retention)
    })
}
