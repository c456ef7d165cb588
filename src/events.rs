//! Baseflow period analysis.
//!
//! Groups consecutive baseflow-only rows into periods and summarises how
//! long those periods last per year, month and season. Durations are
//! `end - start` in whole days, so a one-row period lasts 0 days.

use crate::error::{BaseflowError, Result};
use crate::models::{Label, Season};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

/// A contiguous run of baseflow-only rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseflowPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl BaseflowPeriod {
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Meteorological season of a month (DJF winter, MAM spring, ...)
pub fn season_for_month(month: u32) -> Season {
    match month {
        3..=5 => Season::Spring,
        6..=8 => Season::Summer,
        9..=11 => Season::Autumn,
        _ => Season::Winter,
    }
}

/// Collapse aligned `timestamps`/`labels` into baseflow-only periods
pub fn extract_periods(
    timestamps: &[NaiveDateTime],
    labels: &[Label],
) -> Result<Vec<BaseflowPeriod>> {
    if timestamps.len() != labels.len() {
        return Err(BaseflowError::column_mismatch(
            "Date",
            timestamps.len(),
            "Label",
            labels.len(),
        ));
    }

    let mut periods = Vec::new();
    let mut current: Option<BaseflowPeriod> = None;

    for (ts, label) in timestamps.iter().zip(labels) {
        let date = ts.date();
        match (label, current.as_mut()) {
            (Label::BaseflowOnly, Some(period)) => period.end = date,
            (Label::BaseflowOnly, None) => {
                current = Some(BaseflowPeriod {
                    start: date,
                    end: date,
                })
            }
            (Label::NotBaseflow, _) => periods.extend(current.take()),
        }
    }
    periods.extend(current);

    Ok(periods)
}

/// Duration statistics keyed by each period's start date
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeriodSummary {
    pub period_count: usize,
    pub average_duration_by_year: BTreeMap<i32, f64>,
    pub total_duration_by_year: BTreeMap<i32, i64>,
    pub total_duration_by_month: BTreeMap<u32, i64>,
    pub total_duration_by_season: BTreeMap<Season, i64>,
}

pub fn summarize_periods(periods: &[BaseflowPeriod]) -> PeriodSummary {
    let mut summary = PeriodSummary {
        period_count: periods.len(),
        ..Default::default()
    };
    let mut counts_by_year: BTreeMap<i32, usize> = BTreeMap::new();

    for period in periods {
        let days = period.duration_days();
        let year = period.start.year();
        let month = period.start.month();

        *summary.total_duration_by_year.entry(year).or_default() += days;
        *summary.total_duration_by_month.entry(month).or_default() += days;
        *summary
            .total_duration_by_season
            .entry(season_for_month(month))
            .or_default() += days;
        *counts_by_year.entry(year).or_default() += 1;
    }

    summary.average_duration_by_year = summary
        .total_duration_by_year
        .iter()
        .map(|(year, total)| (*year, *total as f64 / counts_by_year[year] as f64))
        .collect();

    summary
}

/// `log10(Q)` per row; `None` where discharge is not positive
pub fn recession_index(discharge: &[f64]) -> Vec<Option<f64>> {
    discharge
        .iter()
        .map(|&q| (q > 0.0).then(|| q.log10()))
        .collect()
}
