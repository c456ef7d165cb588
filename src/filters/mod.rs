//! Recursive digital filter bank.
//!
//! Every algorithm maps a gap-free discharge series `Q` to a baseflow
//! series `B` of the same length with `B[0] = Q[0]`. Parameters are
//! checked against their domain before any computation; nothing is
//! returned for an out-of-domain coefficient.
//!
//! Algorithm selection is data: a [`FilterSpec`] names the algorithm and
//! carries its coefficients, so pipelines pick filters from configuration.

pub mod multipass;
pub mod recursive;
pub mod runoff;

#[cfg(test)]
pub mod tests;

use crate::constants::QUICKFLOW_SUFFIX;
use crate::error::{BaseflowError, Result};
use crate::models::{BaseflowSeries, DenseSeries};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A filter algorithm together with its coefficients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
pub enum FilterSpec {
    LyneHollick {
        alpha: f64,
    },
    Chapman {
        alpha: f64,
    },
    Eckhardt {
        alpha: f64,
        bfi_max: f64,
    },
    ChapmanMaxwell {
        k: f64,
    },
    Boughton {
        k: f64,
        c: f64,
    },
    FureyGupta {
        gamma: f64,
        c1: f64,
        c3: f64,
    },
    Tr55 {
        curve_number: f64,
        #[serde(default)]
        initial_abstraction: Option<f64>,
    },
    #[serde(rename = "hydrun")]
    HydRun {
        k: f64,
        passes: usize,
    },
}

impl FilterSpec {
    /// Canonical output column name
    pub fn name(&self) -> &'static str {
        match self {
            FilterSpec::LyneHollick { .. } => "Lyne_Hollick",
            FilterSpec::Chapman { .. } => "Chapman",
            FilterSpec::Eckhardt { .. } => "Eckhardt",
            FilterSpec::ChapmanMaxwell { .. } => "Chapman_Maxwell",
            FilterSpec::Boughton { .. } => "Boughton",
            FilterSpec::FureyGupta { .. } => "Furey_Gupta",
            FilterSpec::Tr55 { .. } => "TR55",
            FilterSpec::HydRun { .. } => "HydRun",
        }
    }

    /// Column names this filter contributes to the output table
    pub fn output_columns(&self) -> Vec<String> {
        let mut columns = vec![self.name().to_string()];
        if matches!(self, FilterSpec::ChapmanMaxwell { .. }) {
            columns.push(format!("{}{}", self.name(), QUICKFLOW_SUFFIX));
        }
        columns
    }

    /// Whether the filter needs a precipitation series
    pub fn requires_precipitation(&self) -> bool {
        matches!(self, FilterSpec::Tr55 { .. })
    }

    /// Check every coefficient against its documented domain
    pub fn validate(&self) -> Result<()> {
        match *self {
            FilterSpec::LyneHollick { alpha } => {
                recursive::check_closed_unit(self.name(), "alpha", alpha)
            }
            FilterSpec::Chapman { alpha } => {
                recursive::check_closed_unit(self.name(), "alpha", alpha)
            }
            FilterSpec::Eckhardt { alpha, bfi_max } => {
                recursive::check_open_unit(self.name(), "alpha", alpha)?;
                recursive::check_open_unit(self.name(), "bfi_max", bfi_max)
            }
            FilterSpec::ChapmanMaxwell { k } => {
                recursive::check_closed_unit(self.name(), "k", k)
            }
            FilterSpec::Boughton { k, c } => {
                recursive::check_closed_unit(self.name(), "k", k)?;
                recursive::check_non_negative(self.name(), "c", c)
            }
            FilterSpec::FureyGupta { gamma, c1, c3 } => {
                recursive::check_closed_unit(self.name(), "gamma", gamma)?;
                recursive::check_positive(self.name(), "c1", c1)?;
                recursive::check_non_negative(self.name(), "c3", c3)
            }
            FilterSpec::Tr55 {
                curve_number,
                initial_abstraction,
            } => runoff::validate_tr55(curve_number, initial_abstraction),
            FilterSpec::HydRun { k, passes } => multipass::validate_hydrun(k, passes),
        }
    }

    /// Run the filter over a gap-free series
    pub fn apply(&self, series: &DenseSeries) -> Result<BaseflowSeries> {
        self.apply_to(&series.discharge, series.precipitation.as_deref())
    }

    /// Run the filter over raw discharge (and optional precipitation) slices
    pub fn apply_to(
        &self,
        discharge: &[f64],
        precipitation: Option<&[f64]>,
    ) -> Result<BaseflowSeries> {
        self.validate()?;

        let output = match *self {
            FilterSpec::LyneHollick { alpha } => {
                BaseflowSeries::new(self.name(), recursive::lyne_hollick(discharge, alpha)?)
            }
            FilterSpec::Chapman { alpha } => {
                BaseflowSeries::new(self.name(), recursive::chapman(discharge, alpha)?)
            }
            FilterSpec::Eckhardt { alpha, bfi_max } => BaseflowSeries::new(
                self.name(),
                recursive::eckhardt(discharge, alpha, bfi_max)?,
            ),
            FilterSpec::ChapmanMaxwell { k } => {
                let baseflow = recursive::chapman_maxwell(discharge, k)?;
                let quickflow = recursive::clamped_quickflow(discharge, &baseflow);
                BaseflowSeries::new(self.name(), baseflow).with_quickflow(quickflow)
            }
            FilterSpec::Boughton { k, c } => {
                BaseflowSeries::new(self.name(), recursive::boughton(discharge, k, c)?)
            }
            FilterSpec::FureyGupta { gamma, c1, c3 } => BaseflowSeries::new(
                self.name(),
                recursive::furey_gupta(discharge, gamma, c1, c3)?,
            ),
            FilterSpec::Tr55 {
                curve_number,
                initial_abstraction,
            } => {
                let precipitation =
                    precipitation.ok_or_else(|| BaseflowError::InsufficientData {
                        reason: "TR-55 separation requires a precipitation series".to_string(),
                    })?;
                BaseflowSeries::new(
                    self.name(),
                    runoff::tr55(discharge, precipitation, curve_number, initial_abstraction)?,
                )
            }
            FilterSpec::HydRun { k, passes } => {
                BaseflowSeries::new(self.name(), multipass::hydrun(discharge, k, passes)?)
            }
        };

        debug!("{} filter produced {} values", self.name(), output.len());
        Ok(output)
    }

    /// The filter set used by the reference analysis runs
    pub fn reference_bank() -> Vec<FilterSpec> {
        use crate::constants::*;
        vec![
            FilterSpec::LyneHollick {
                alpha: DEFAULT_LYNE_HOLLICK_ALPHA,
            },
            FilterSpec::Chapman {
                alpha: DEFAULT_CHAPMAN_ALPHA,
            },
            FilterSpec::Eckhardt {
                alpha: DEFAULT_ECKHARDT_ALPHA,
                bfi_max: DEFAULT_ECKHARDT_BFI_MAX,
            },
            FilterSpec::ChapmanMaxwell {
                k: DEFAULT_CHAPMAN_MAXWELL_K,
            },
        ]
    }
}
