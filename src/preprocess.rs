//! Gap removal for raw discharge records.
//!
//! Turns a `DischargeSeries` with missing values into a `DenseSeries`.
//! The caller's series is only read; every policy builds new vectors.

use crate::error::{BaseflowError, Result};
use crate::models::{DenseSeries, DischargeSeries};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How missing discharge values are removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GapPolicy {
    /// Remove missing rows and compact the series
    Drop,
    /// Carry the last observed value forward; keeps every timestamp
    #[default]
    #[serde(alias = "forward-fill")]
    #[value(alias = "forward-fill")]
    Ffill,
}

/// Produce a gap-free copy of `series` using `policy`.
///
/// Missing precipitation (when the series carries any) is read as zero
/// depth under both policies.
pub fn fill_gaps(series: &DischargeSeries, policy: GapPolicy) -> Result<DenseSeries> {
    if series.is_empty() {
        return Err(BaseflowError::EmptySeries);
    }

    let with_precip = series.has_precipitation();
    let capacity = series.len();
    let mut timestamps = Vec::with_capacity(capacity);
    let mut discharge = Vec::with_capacity(capacity);
    let mut precipitation = with_precip.then(|| Vec::with_capacity(capacity));

    match policy {
        GapPolicy::Drop => {
            for obs in series.observations() {
                if let Some(value) = obs.discharge {
                    timestamps.push(obs.timestamp);
                    discharge.push(value);
                    if let Some(p) = precipitation.as_mut() {
                        p.push(obs.precipitation.unwrap_or(0.0));
                    }
                }
            }

            if discharge.is_empty() {
                return Err(BaseflowError::InsufficientData {
                    reason: "every discharge value is missing".to_string(),
                });
            }
        }
        GapPolicy::Ffill => {
            let mut last: Option<f64> = None;
            for obs in series.observations() {
                let value = match obs.discharge.or(last) {
                    Some(value) => value,
                    None => {
                        return Err(BaseflowError::InsufficientData {
                            reason: format!(
                                "series starts with a missing value at {}; nothing to carry forward",
                                obs.timestamp
                            ),
                        });
                    }
                };
                last = Some(value);
                timestamps.push(obs.timestamp);
                discharge.push(value);
                if let Some(p) = precipitation.as_mut() {
                    p.push(obs.precipitation.unwrap_or(0.0));
                }
            }
        }
    }

    debug!(
        "Gap policy {:?}: {} rows in, {} rows out ({} missing)",
        policy,
        series.len(),
        discharge.len(),
        series.missing_count()
    );

    Ok(DenseSeries {
        station: series.station().map(str::to_string),
        timestamps,
        discharge,
        precipitation,
    })
}
