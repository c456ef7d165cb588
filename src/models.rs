//! Core data structures and types for baseflow processing.
//!
//! Defines the raw and gap-free discharge series, filter outputs,
//! calendar fields, labels and processing statistics used throughout
//! the library.

use crate::constants::{LABEL_BASEFLOW_ONLY, LABEL_NOT_BASEFLOW};
use crate::error::{BaseflowError, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// One sampling interval of a raw gauge record
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub timestamp: NaiveDateTime,
    /// `None` when the gauge reported no usable value
    pub discharge: Option<f64>,
    /// Optional precipitation depth for runoff-based separation
    pub precipitation: Option<f64>,
}

impl Observation {
    pub fn new(timestamp: NaiveDateTime, discharge: Option<f64>) -> Self {
        Self {
            timestamp,
            discharge,
            precipitation: None,
        }
    }

    pub fn with_precipitation(mut self, precipitation: Option<f64>) -> Self {
        self.precipitation = precipitation;
        self
    }
}

/// Ordered discharge record as delivered by a data source, gaps included.
///
/// Timestamps are strictly increasing; the constructor enforces it.
#[derive(Debug, Clone, PartialEq)]
pub struct DischargeSeries {
    station: Option<String>,
    observations: Vec<Observation>,
}

impl DischargeSeries {
    pub fn new(observations: Vec<Observation>) -> Result<Self> {
        for pair in observations.windows(2) {
            if pair[1].timestamp <= pair[0].timestamp {
                return Err(BaseflowError::invalid_timestamp(format!(
                    "{} does not follow {}",
                    pair[1].timestamp, pair[0].timestamp
                )));
            }
        }

        Ok(Self {
            station: None,
            observations,
        })
    }

    pub fn with_station(mut self, station: impl Into<String>) -> Self {
        self.station = Some(station.into());
        self
    }

    pub fn station(&self) -> Option<&str> {
        self.station.as_deref()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Number of observations without a discharge value
    pub fn missing_count(&self) -> usize {
        self.observations
            .iter()
            .filter(|obs| obs.discharge.is_none())
            .count()
    }

    /// Whether any observation carries a precipitation value
    pub fn has_precipitation(&self) -> bool {
        self.observations
            .iter()
            .any(|obs| obs.precipitation.is_some())
    }
}

/// Gap-free series produced by the preprocessor and shared read-only by
/// every downstream stage.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseSeries {
    pub station: Option<String>,
    pub timestamps: Vec<NaiveDateTime>,
    pub discharge: Vec<f64>,
    pub precipitation: Option<Vec<f64>>,
}

impl DenseSeries {
    pub fn len(&self) -> usize {
        self.discharge.len()
    }

    pub fn is_empty(&self) -> bool {
        self.discharge.is_empty()
    }
}

/// Output of a single filter invocation, aligned with its input series
#[derive(Debug, Clone, PartialEq)]
pub struct BaseflowSeries {
    name: &'static str,
    values: Vec<f64>,
    quickflow: Option<Vec<f64>>,
}

impl BaseflowSeries {
    pub fn new(name: &'static str, values: Vec<f64>) -> Self {
        Self {
            name,
            values,
            quickflow: None,
        }
    }

    pub fn with_quickflow(mut self, quickflow: Vec<f64>) -> Self {
        self.quickflow = Some(quickflow);
        self
    }

    /// Canonical column name of the filter that produced this series
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn quickflow(&self) -> Option<&[f64]> {
        self.quickflow.as_deref()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

/// Season index derived from fixed day-of-year windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Season {
    Winter = 1,
    Spring = 2,
    Summer = 3,
    Autumn = 4,
}

impl Season {
    pub fn index(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
        }
    }
}

/// Calendar attributes of one timestamp, used only as grouping keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarFields {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub iso_week: u32,
    pub day_of_year: u32,
    pub season: Season,
}

/// Per-row classification attached as the pipeline's terminal column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    BaseflowOnly,
    NotBaseflow,
}

impl Label {
    pub fn as_str(self) -> &'static str {
        match self {
            Label::BaseflowOnly => LABEL_BASEFLOW_ONLY,
            Label::NotBaseflow => LABEL_NOT_BASEFLOW,
        }
    }

    /// Parse a persisted label value
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            LABEL_BASEFLOW_ONLY => Some(Label::BaseflowOnly),
            LABEL_NOT_BASEFLOW => Some(Label::NotBaseflow),
            _ => None,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Processing statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub files_processed: usize,
    pub files_failed: usize,
    pub total_rows: usize,
    pub baseflow_rows: usize,
    pub output_paths: Vec<PathBuf>,
    pub processing_time_ms: u128,
}

impl ProcessingStats {
    /// Share of labeled rows classified as baseflow-only, in percent
    pub fn baseflow_share(&self) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            (self.baseflow_rows as f64 / self.total_rows as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_series_rejects_non_increasing_timestamps() {
        let observations = vec![
            Observation::new(ts(2), Some(1.0)),
            Observation::new(ts(2), Some(2.0)),
        ];
        let result = DischargeSeries::new(observations);
        assert!(matches!(result, Err(BaseflowError::InvalidTimestamp { .. })));
    }

    #[test]
    fn test_series_counts_missing_values() {
        let series = DischargeSeries::new(vec![
            Observation::new(ts(1), Some(1.0)),
            Observation::new(ts(2), None),
            Observation::new(ts(3), None),
        ])
        .unwrap()
        .with_station("01636500");

        assert_eq!(series.len(), 3);
        assert_eq!(series.missing_count(), 2);
        assert_eq!(series.station(), Some("01636500"));
        assert!(!series.has_precipitation());
    }

    #[test]
    fn test_label_round_trip_through_text() {
        assert_eq!(Label::parse("BFO"), Some(Label::BaseflowOnly));
        assert_eq!(Label::parse(" NBF "), Some(Label::NotBaseflow));
        assert_eq!(Label::parse("other"), None);
        assert_eq!(Label::BaseflowOnly.to_string(), "BFO");
    }

    #[test]
    fn test_processing_stats_baseflow_share() {
        let mut stats = ProcessingStats::default();
        assert_eq!(stats.baseflow_share(), 0.0);

        stats.total_rows = 200;
        stats.baseflow_rows = 50;
        assert_eq!(stats.baseflow_share(), 25.0);
    }
}
