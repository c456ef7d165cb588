//! Baseflow separation and labeling pipeline.
//!
//! Runs the stages in order: gap removal, filter bank, calendar
//! decomposition, quantile thresholds, classification and table assembly.
//! Configuration is validated first; any stage error aborts the run and
//! no table is returned.

use crate::calendar::decompose_all;
use crate::classifier::{NamedColumn, count_baseflow, label_rows};
use crate::config::BaseflowConfig;
use crate::constants::*;
use crate::error::{BaseflowError, Result};
use crate::models::{CalendarFields, DenseSeries, DischargeSeries, Label};
use crate::preprocess::fill_gaps;
use crate::quantile::broadcast_quantile;
use chrono::{NaiveDateTime, Timelike};
use polars::prelude::*;
use tracing::debug;

/// Labeled output of one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub station: Option<String>,
    pub table: DataFrame,
    pub timestamps: Vec<NaiveDateTime>,
    pub labels: Option<Vec<Label>>,
}

impl PipelineOutput {
    pub fn rows(&self) -> usize {
        self.table.height()
    }

    /// Rows labeled baseflow-only; zero when no label stage ran
    pub fn baseflow_rows(&self) -> usize {
        self.labels.as_deref().map(count_baseflow).unwrap_or(0)
    }
}

/// Named numeric columns produced so far, in attachment order
#[derive(Debug, Default)]
struct NumericColumns(Vec<(String, Vec<f64>)>);

impl NumericColumns {
    fn push(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.0.push((name.into(), values));
    }

    fn get(&self, name: &str) -> Result<&[f64]> {
        self.0
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, values)| values.as_slice())
            .ok_or_else(|| BaseflowError::UnknownColumn {
                name: name.to_string(),
            })
    }
}

fn format_dates(timestamps: &[NaiveDateTime]) -> Vec<String> {
    let daily = timestamps
        .iter()
        .all(|ts| ts.num_seconds_from_midnight() == 0);
    let format = if daily { "%Y-%m-%d" } else { "%Y-%m-%d %H:%M:%S" };
    timestamps
        .iter()
        .map(|ts| ts.format(format).to_string())
        .collect()
}

fn calendar_columns(calendar: &[CalendarFields]) -> Vec<Column> {
    let field = |name: &str, f: fn(&CalendarFields) -> i32| {
        Column::new(name.into(), calendar.iter().map(f).collect::<Vec<i32>>())
    };
    vec![
        field(COL_YEAR, |c| c.year),
        field(COL_MONTH, |c| c.month as i32),
        field(COL_DAY, |c| c.day as i32),
        field(COL_WEEK, |c| c.iso_week as i32),
        field(COL_DAY_OF_YEAR, |c| c.day_of_year as i32),
        field(COL_SEASON, |c| c.season.index()),
    ]
}

/// Run every stage over an already gap-free series
pub fn run_dense(dense: &DenseSeries, config: &BaseflowConfig) -> Result<PipelineOutput> {
    if dense.is_empty() {
        return Err(BaseflowError::EmptySeries);
    }

    let mut numeric = NumericColumns::default();
    numeric.push(COL_DISCHARGE, dense.discharge.clone());

    for filter in &config.filters {
        let output = filter.apply(dense)?;
        let quickflow = output.quickflow().map(<[f64]>::to_vec);
        numeric.push(output.name(), output.into_values());
        if let Some(quickflow) = quickflow {
            numeric.push(format!("{}{}", filter.name(), QUICKFLOW_SUFFIX), quickflow);
        }
    }

    let calendar = decompose_all(&dense.timestamps);

    for threshold in &config.thresholds {
        let values = broadcast_quantile(
            &dense.discharge,
            &calendar,
            threshold.field,
            threshold.quantile,
        )?;
        numeric.push(threshold.column_name(), values);
    }

    let labels = config
        .label
        .as_ref()
        .map(|spec| {
            label_rows(
                NamedColumn::new(&spec.left, numeric.get(&spec.left)?),
                NamedColumn::new(&spec.right, numeric.get(&spec.right)?),
                spec.tolerance,
            )
        })
        .transpose()?;

    let mut columns = vec![Column::new(COL_DATE.into(), format_dates(&dense.timestamps))];
    let mut numeric = numeric.0.into_iter();
    if let Some((name, values)) = numeric.next() {
        columns.push(Column::new(name.as_str().into(), values));
    }
    columns.extend(calendar_columns(&calendar));
    columns.extend(numeric.map(|(name, values)| Column::new(name.as_str().into(), values)));
    if let Some(labels) = &labels {
        columns.push(Column::new(
            COL_LABEL.into(),
            labels.iter().map(|l| l.as_str()).collect::<Vec<_>>(),
        ));
    }

    let mut table = DataFrame::new(columns)?;

    if let Some(order) = &config.columns {
        let available = table.get_column_names_str();
        if let Some(unknown) = order.iter().find(|name| !available.contains(&name.as_str())) {
            return Err(BaseflowError::UnknownColumn {
                name: unknown.clone(),
            });
        }
        table = table
            .lazy()
            .select(order.iter().map(|name| col(name.as_str())).collect::<Vec<_>>())
            .collect()?;
    }

    debug!(
        "Pipeline produced {} rows x {} columns for {}",
        table.height(),
        table.width(),
        dense.station.as_deref().unwrap_or("unnamed series")
    );

    Ok(PipelineOutput {
        station: dense.station.clone(),
        table,
        timestamps: dense.timestamps.clone(),
        labels,
    })
}

/// Validate `config`, remove gaps from `series` and run every stage
pub fn run_pipeline(series: &DischargeSeries, config: &BaseflowConfig) -> Result<PipelineOutput> {
    config.validate()?;
    let dense = fill_gaps(series, config.gap_policy)?;
    debug!(
        "Gap policy {:?} kept {} of {} rows",
        config.gap_policy,
        dense.len(),
        series.len()
    );
    run_dense(&dense, config)
}
