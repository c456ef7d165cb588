//! Group-wise quantile thresholds.
//!
//! Discharge is grouped by a calendar field, the requested quantile is
//! computed per group with linear interpolation between order statistics,
//! and the group's value is broadcast back onto each of its rows.

use crate::calendar::{CalendarField, decompose_all};
use crate::constants::COL_DATE;
use crate::error::{BaseflowError, Result};
use crate::events::recession_index;
use crate::models::{CalendarFields, DenseSeries};
use polars::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use tracing::debug;

/// Per-group quantile values for one calendar field
#[derive(Debug, Clone, PartialEq)]
pub struct QuantileTable {
    pub field: CalendarField,
    pub quantile: f64,
    pub values: BTreeMap<i32, f64>,
}

impl QuantileTable {
    pub fn get(&self, key: i32) -> Option<f64> {
        self.values.get(&key).copied()
    }
}

pub fn validate_quantile(quantile: f64) -> Result<()> {
    if (0.0..=1.0).contains(&quantile) {
        Ok(())
    } else {
        Err(BaseflowError::InvalidQuantile { quantile })
    }
}

/// Output column name, e.g. `Month Quantile 0.9`
pub fn column_name(field: CalendarField, quantile: f64) -> String {
    format!("{} Quantile {}", field.column_name(), quantile)
}

/// Linear-interpolation quantile of an ascending slice; `None` when empty
pub fn quantile_sorted(sorted: &[f64], quantile: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let position = quantile * last as f64;
    let lower = position.floor() as usize;
    let upper = (lower + 1).min(last);
    let fraction = position - lower as f64;
    Some(sorted[lower] + fraction * (sorted[upper] - sorted[lower]))
}

/// Linear-interpolation quantile of unordered values
pub fn quantile(values: &[f64], quantile: f64) -> Result<f64> {
    validate_quantile(quantile)?;
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    quantile_sorted(&sorted, quantile).ok_or(BaseflowError::EmptySeries)
}

fn check_aligned(discharge: &[f64], calendar: &[CalendarFields]) -> Result<()> {
    if discharge.len() != calendar.len() {
        return Err(BaseflowError::column_mismatch(
            "Discharge",
            discharge.len(),
            "Calendar",
            calendar.len(),
        ));
    }
    Ok(())
}

/// Compute the `quantile` of discharge within each `field` group
pub fn group_quantiles(
    discharge: &[f64],
    calendar: &[CalendarFields],
    field: CalendarField,
    quantile: f64,
) -> Result<QuantileTable> {
    validate_quantile(quantile)?;
    check_aligned(discharge, calendar)?;

    let mut groups: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for (value, fields) in discharge.iter().zip(calendar) {
        groups.entry(field.key(fields)).or_default().push(*value);
    }

    let mut values = BTreeMap::new();
    for (key, mut members) in groups {
        members.sort_by(f64::total_cmp);
        let value = quantile_sorted(&members, quantile).ok_or_else(|| {
            BaseflowError::EmptyGroup {
                field: field.column_name().to_string(),
                key,
            }
        })?;
        values.insert(key, value);
    }

    debug!(
        "{}: {} groups for {:?}",
        column_name(field, quantile),
        values.len(),
        field
    );

    Ok(QuantileTable {
        field,
        quantile,
        values,
    })
}

/// Group quantile broadcast onto every row; same length as `discharge`
pub fn broadcast_quantile(
    discharge: &[f64],
    calendar: &[CalendarFields],
    field: CalendarField,
    quantile: f64,
) -> Result<Vec<f64>> {
    let table = group_quantiles(discharge, calendar, field, quantile)?;

    calendar
        .iter()
        .map(|fields| {
            let key = field.key(fields);
            table.get(key).ok_or_else(|| BaseflowError::EmptyGroup {
                field: field.column_name().to_string(),
                key,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Threshold summary
// ---------------------------------------------------------------------------

/// Mean discharge per group, broadcast back onto rows
fn broadcast_mean<K: Eq + Hash + Copy>(
    discharge: &[f64],
    calendar: &[CalendarFields],
    key: impl Fn(&CalendarFields) -> K,
) -> Vec<f64> {
    let mut sums: HashMap<K, (f64, usize)> = HashMap::new();
    for (value, fields) in discharge.iter().zip(calendar) {
        let entry = sums.entry(key(fields)).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }

    calendar
        .iter()
        .map(|fields| {
            let (sum, count) = sums[&key(fields)];
            sum / count as f64
        })
        .collect()
}

/// One decimal place, halves to even
fn round1(values: Vec<f64>) -> Vec<f64> {
    values
        .into_iter()
        .map(|v| (v * 10.0).round_ties_even() / 10.0)
        .collect()
}

/// Seasonal context of every row: within-year period means and pooled
/// quantile thresholds per calendar period.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdSummary {
    pub dates: Vec<String>,
    pub daily_streamflow: Vec<f64>,
    pub weekly_streamflow: Vec<f64>,
    pub monthly_streamflow: Vec<f64>,
    pub seasonal_streamflow: Vec<f64>,
    pub yearly_streamflow: Vec<f64>,
    pub daily_threshold: Vec<f64>,
    pub weekly_threshold: Vec<f64>,
    pub monthly_threshold: Vec<f64>,
    pub seasonal_threshold: Vec<f64>,
    pub yearly_threshold: Vec<f64>,
    pub percentile: f64,
    /// Unrounded `log10(Q)`; `None` where discharge is not positive
    pub log_discharge: Vec<Option<f64>>,
}

/// Build the summary for `series`, every value rounded to one decimal
pub fn threshold_summary(series: &DenseSeries, quantile: f64) -> Result<ThresholdSummary> {
    validate_quantile(quantile)?;
    if series.is_empty() {
        return Err(BaseflowError::EmptySeries);
    }

    let q = &series.discharge;
    let calendar = decompose_all(&series.timestamps);
    let threshold = |field| broadcast_quantile(q, &calendar, field, quantile).map(round1);

    Ok(ThresholdSummary {
        dates: series
            .timestamps
            .iter()
            .map(|ts| ts.format("%Y-%m-%d").to_string())
            .collect(),
        daily_streamflow: round1(q.clone()),
        weekly_streamflow: round1(broadcast_mean(q, &calendar, |f| (f.year, f.iso_week))),
        monthly_streamflow: round1(broadcast_mean(q, &calendar, |f| (f.year, f.month))),
        seasonal_streamflow: round1(broadcast_mean(q, &calendar, |f| (f.year, f.season))),
        yearly_streamflow: round1(broadcast_mean(q, &calendar, |f| f.year)),
        daily_threshold: threshold(CalendarField::DayOfYear)?,
        weekly_threshold: threshold(CalendarField::Week)?,
        monthly_threshold: threshold(CalendarField::Month)?,
        seasonal_threshold: threshold(CalendarField::Season)?,
        yearly_threshold: threshold(CalendarField::Year)?,
        percentile: quantile,
        log_discharge: recession_index(q),
    })
}

impl ThresholdSummary {
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let rows = self.dates.len();
        let df = DataFrame::new(vec![
            Column::new(COL_DATE.into(), &self.dates),
            Column::new("Daily Streamflow".into(), &self.daily_streamflow),
            Column::new("Weekly Streamflow".into(), &self.weekly_streamflow),
            Column::new("Monthly Streamflow".into(), &self.monthly_streamflow),
            Column::new("Seasonal Streamflow".into(), &self.seasonal_streamflow),
            Column::new("Yearly Streamflow".into(), &self.yearly_streamflow),
            Column::new("Daily Threshold".into(), &self.daily_threshold),
            Column::new("Weekly Threshold".into(), &self.weekly_threshold),
            Column::new("Monthly Threshold".into(), &self.monthly_threshold),
            Column::new("Seasonal Threshold".into(), &self.seasonal_threshold),
            Column::new("Yearly Threshold".into(), &self.yearly_threshold),
            Column::new("Percentile".into(), vec![self.percentile; rows]),
            Column::new("Log Discharge".into(), &self.log_discharge),
        ])?;
        Ok(df)
    }
}
