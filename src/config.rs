//! Configuration management and validation.
//!
//! A `BaseflowConfig` describes one pipeline run: how gaps are removed,
//! which filters run, which quantile thresholds are attached, which two
//! columns are compared for labeling and how the result is written.
//! Loading is layered (defaults, then a TOML file, then CLI overrides)
//! and `validate()` checks every parameter before any input is read.

use crate::calendar::CalendarField;
use crate::classifier::validate_tolerance;
use crate::constants::*;
use crate::error::{BaseflowError, Result};
use crate::filters::FilterSpec;
use crate::input::InputColumns;
use crate::preprocess::GapPolicy;
use crate::quantile::{self, validate_quantile};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A quantile threshold column grouped by one calendar field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSpec {
    pub field: CalendarField,
    pub quantile: f64,
}

impl ThresholdSpec {
    pub fn new(field: CalendarField, quantile: f64) -> Self {
        Self { field, quantile }
    }

    pub fn column_name(&self) -> String {
        quantile::column_name(self.field, self.quantile)
    }
}

/// The two columns compared by the event classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelSpec {
    pub left: String,
    pub right: String,
    pub tolerance: f64,
}

impl Default for LabelSpec {
    fn default() -> Self {
        Self {
            left: "Eckhardt".to_string(),
            right: "Chapman_Maxwell".to_string(),
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// Output table file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Parquet,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Parquet => "parquet",
        }
    }
}

/// Main configuration for a baseflow processing run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseflowConfig {
    /// How missing discharge values are removed
    pub gap_policy: GapPolicy,

    /// Filters to run, in output column order
    pub filters: Vec<FilterSpec>,

    /// Quantile threshold columns to attach
    pub thresholds: Vec<ThresholdSpec>,

    /// Classifier comparison; no `Label` column when absent
    pub label: Option<LabelSpec>,

    /// Explicit output column order (subset allowed)
    pub columns: Option<Vec<String>>,

    pub output_format: OutputFormat,

    /// Number of files processed concurrently
    pub workers: usize,

    /// Input column names for CSV sources
    pub input: InputColumns,
}

impl Default for BaseflowConfig {
    fn default() -> Self {
        Self {
            gap_policy: GapPolicy::default(),
            filters: FilterSpec::reference_bank(),
            thresholds: vec![ThresholdSpec::new(CalendarField::Month, DEFAULT_QUANTILE)],
            label: Some(LabelSpec::default()),
            columns: None,
            output_format: OutputFormat::default(),
            workers: num_cpus::get(),
            input: InputColumns::default(),
        }
    }
}

impl BaseflowConfig {
    /// Location of the per-user configuration file
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Parse a TOML document; unspecified keys keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text)
            .map_err(|e| BaseflowError::configuration(format!("Invalid TOML configuration: {e}")))
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            BaseflowError::configuration(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&text)
    }

    /// Defaults, overlaid by `explicit` or else the per-user file when present
    pub fn load_layered(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(BaseflowError::configuration(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            debug!("Loading configuration from {}", path.display());
            return Self::from_toml_file(path);
        }

        match Self::default_config_path().filter(|path| path.exists()) {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                Self::from_toml_file(&path)
            }
            None => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| BaseflowError::configuration(format!("Failed to serialize config: {e}")))
    }

    pub fn with_gap_policy(mut self, gap_policy: GapPolicy) -> Self {
        self.gap_policy = gap_policy;
        self
    }

    pub fn with_filters(mut self, filters: Vec<FilterSpec>) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_thresholds(mut self, thresholds: Vec<ThresholdSpec>) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_label(mut self, label: LabelSpec) -> Self {
        self.label = Some(label);
        self
    }

    /// Drop the classifier stage
    pub fn without_label(mut self) -> Self {
        self.label = None;
        self
    }

    /// Set the classifier tolerance, keeping the compared columns
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.label.get_or_insert_with(LabelSpec::default).tolerance = tolerance;
        self
    }

    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = Some(columns);
        self
    }

    pub fn with_output_format(mut self, output_format: OutputFormat) -> Self {
        self.output_format = output_format;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_input_columns(mut self, input: InputColumns) -> Self {
        self.input = input;
        self
    }

    /// Every column the pipeline can produce with this configuration, in
    /// default output order
    pub fn available_columns(&self) -> Vec<String> {
        let mut columns = vec![COL_DATE.to_string(), COL_DISCHARGE.to_string()];
        columns.extend(CALENDAR_COLUMNS.iter().map(|c| c.to_string()));
        for filter in &self.filters {
            columns.extend(filter.output_columns());
        }
        columns.extend(self.thresholds.iter().map(ThresholdSpec::column_name));
        if self.label.is_some() {
            columns.push(COL_LABEL.to_string());
        }
        columns
    }

    /// Numeric columns the classifier may compare
    fn comparable_columns(&self) -> HashSet<String> {
        let mut columns: HashSet<String> = HashSet::from([COL_DISCHARGE.to_string()]);
        for filter in &self.filters {
            columns.extend(filter.output_columns());
        }
        columns.extend(self.thresholds.iter().map(ThresholdSpec::column_name));
        columns
    }

    /// Check every parameter and column reference
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(BaseflowError::configuration(
                "workers must be greater than 0",
            ));
        }

        let mut seen = HashSet::new();
        for filter in &self.filters {
            filter.validate()?;
            if !seen.insert(filter.name()) {
                return Err(BaseflowError::configuration(format!(
                    "filter {} is configured more than once",
                    filter.name()
                )));
            }
            if filter.requires_precipitation() && self.input.precipitation.is_none() {
                return Err(BaseflowError::configuration(format!(
                    "filter {} needs a precipitation column (input.precipitation)",
                    filter.name()
                )));
            }
        }

        let mut threshold_names = HashSet::new();
        for threshold in &self.thresholds {
            validate_quantile(threshold.quantile)?;
            let name = threshold.column_name();
            if !threshold_names.insert(name.clone()) {
                return Err(BaseflowError::configuration(format!(
                    "threshold column '{name}' is configured more than once"
                )));
            }
        }

        if let Some(label) = &self.label {
            validate_tolerance(label.tolerance)?;
            let comparable = self.comparable_columns();
            for name in [&label.left, &label.right] {
                if !comparable.contains(name) {
                    return Err(BaseflowError::UnknownColumn { name: name.clone() });
                }
            }
        }

        if let Some(columns) = &self.columns {
            let available: HashSet<String> = self.available_columns().into_iter().collect();
            if let Some(unknown) = columns.iter().find(|name| !available.contains(*name)) {
                return Err(BaseflowError::UnknownColumn {
                    name: unknown.clone(),
                });
            }
            let mut selected = HashSet::new();
            if let Some(repeated) = columns.iter().find(|name| !selected.insert(name.as_str())) {
                return Err(BaseflowError::configuration(format!(
                    "output column '{repeated}' is listed more than once"
                )));
            }
        }

        debug!(
            "Configuration valid: {} filters, {} thresholds, label {}",
            self.filters.len(),
            self.thresholds.len(),
            if self.label.is_some() { "on" } else { "off" }
        );
        Ok(())
    }
}
