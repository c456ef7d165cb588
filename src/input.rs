//! Discharge series readers.
//!
//! Two on-disk layouts are understood: a CSV table with a date column and
//! a discharge column, and USGS NWIS daily-value RDB text. Both yield a
//! `DischargeSeries` with unusable values marked missing.

use crate::calendar::parse_timestamp;
use crate::constants::{COL_DATE, COL_DISCHARGE, COL_LABEL, USGS_MISSING_CODES};
use crate::error::{BaseflowError, Result};
use crate::models::{DischargeSeries, Label, Observation};
use chrono::NaiveDateTime;
use polars::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;

static RDB_STATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#\s+(USGS\s+\d+\s+.+?)\s*$").expect("station pattern is valid")
});

static RDB_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^USGS\t(\d+)\t([^\t]+)\t([^\t]*)").expect("row pattern is valid")
});

/// Column names used when reading CSV input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputColumns {
    pub date: String,
    pub discharge: String,
    pub precipitation: Option<String>,
}

impl Default for InputColumns {
    fn default() -> Self {
        Self {
            date: COL_DATE.to_string(),
            discharge: COL_DISCHARGE.to_string(),
            precipitation: None,
        }
    }
}

/// Read a value cell; blanks, gauge qualifier codes and non-finite
/// numbers are missing
pub fn parse_discharge(raw: Option<&str>) -> Option<f64> {
    let text = raw?.trim();
    if text.is_empty() || USGS_MISSING_CODES.contains(&text) {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn text_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a StringChunked> {
    let column = df
        .column(name)
        .map_err(|_| BaseflowError::UnknownColumn {
            name: name.to_string(),
        })?;
    Ok(column.as_materialized_series().str()?)
}

fn build_series(path: &Path, observations: Vec<Observation>) -> Result<DischargeSeries> {
    DischargeSeries::new(observations).map_err(|e| BaseflowError::InvalidFormat {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn read_text_csv(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(BaseflowError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    Ok(CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?)
}

/// Read a CSV file with a header row; every cell is read as text
pub fn read_series_csv(path: &Path, columns: &InputColumns) -> Result<DischargeSeries> {
    let df = read_text_csv(path)?;

    let dates = text_column(&df, &columns.date)?;
    let values = text_column(&df, &columns.discharge)?;
    let precipitation = columns
        .precipitation
        .as_deref()
        .map(|name| text_column(&df, name))
        .transpose()?;

    let mut observations = Vec::with_capacity(df.height());
    for (row, (date, value)) in dates.into_iter().zip(values.into_iter()).enumerate() {
        let raw_date = date.ok_or_else(|| {
            BaseflowError::invalid_timestamp(format!("<empty> at row {}", row + 1))
        })?;
        let timestamp = parse_timestamp(raw_date)?;
        let precip = precipitation.and_then(|p| parse_discharge(p.get(row)));
        observations
            .push(Observation::new(timestamp, parse_discharge(value)).with_precipitation(precip));
    }

    let station = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default();

    debug!(
        "Read {} rows from CSV {} ({} columns)",
        observations.len(),
        path.display(),
        df.width()
    );

    Ok(build_series(path, observations)?.with_station(station))
}

/// Parse USGS NWIS daily-value RDB text
pub fn parse_usgs_rdb(text: &str, path: &Path) -> Result<DischargeSeries> {
    let mut station = None;
    let mut observations = Vec::new();

    for line in text.lines() {
        if let Some(caps) = RDB_STATION.captures(line) {
            station = Some(caps[1].split_whitespace().collect::<Vec<_>>().join(" "));
            continue;
        }
        if let Some(caps) = RDB_ROW.captures(line) {
            let timestamp = parse_timestamp(&caps[2])?;
            observations.push(Observation::new(timestamp, parse_discharge(Some(&caps[3]))));
        }
    }

    if observations.is_empty() {
        return Err(BaseflowError::InvalidFormat {
            path: path.to_path_buf(),
            reason: "no USGS data rows found".to_string(),
        });
    }

    debug!(
        "Parsed {} RDB rows for {}",
        observations.len(),
        station.as_deref().unwrap_or("unknown station")
    );

    let series = build_series(path, observations)?;
    Ok(match station {
        Some(name) => series.with_station(name),
        None => series,
    })
}

/// Read the `Date` and `Label` columns of a previously labeled table
pub fn read_labels_csv(path: &Path) -> Result<(Vec<NaiveDateTime>, Vec<Label>)> {
    let df = read_text_csv(path)?;
    let dates = text_column(&df, COL_DATE)?;
    let labels = text_column(&df, COL_LABEL)?;

    let mut timestamps = Vec::with_capacity(df.height());
    let mut parsed = Vec::with_capacity(df.height());
    for (row, (date, label)) in dates.into_iter().zip(labels.into_iter()).enumerate() {
        timestamps.push(parse_timestamp(date.unwrap_or_default())?);
        let label = label.and_then(Label::parse).ok_or_else(|| BaseflowError::InvalidFormat {
            path: path.to_path_buf(),
            reason: format!("unrecognised label {:?} at row {}", label.unwrap_or(""), row + 1),
        })?;
        parsed.push(label);
    }

    debug!("Read {} labels from {}", parsed.len(), path.display());
    Ok((timestamps, parsed))
}

/// Read any supported input file, choosing the parser by extension
pub fn read_series(path: &Path, columns: &InputColumns) -> Result<DischargeSeries> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("csv") => read_series_csv(path, columns),
        Some("rdb") | Some("txt") => {
            if !path.exists() {
                return Err(BaseflowError::InputNotFound {
                    path: path.to_path_buf(),
                });
            }
            let text = std::fs::read_to_string(path)?;
            parse_usgs_rdb(&text, path)
        }
        _ => Err(BaseflowError::InvalidFormat {
            path: PathBuf::from(path),
            reason: "unsupported file extension (expected .csv, .rdb or .txt)".to_string(),
        }),
    }
}
