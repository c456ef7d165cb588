//! Error handling for baseflow processing operations.
//!
//! Every validation failure is raised before the stage it guards starts
//! computing, so a failed stage never leaves partially labeled output.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BaseflowError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Invalid parameter for {filter}: {parameter} = {value} is outside {domain}")]
    InvalidParameter {
        filter: String,
        parameter: String,
        value: f64,
        domain: String,
    },

    #[error("Discharge series is empty")]
    EmptySeries,

    #[error("Insufficient data: {reason}")]
    InsufficientData { reason: String },

    #[error("Invalid timestamp: '{value}'")]
    InvalidTimestamp { value: String },

    #[error("Invalid quantile {quantile}: must lie within [0, 1]")]
    InvalidQuantile { quantile: f64 },

    #[error("Group {field}={key} has no observations")]
    EmptyGroup { field: String, key: i32 },

    #[error(
        "Column length mismatch: '{left}' has {left_len} rows, '{right}' has {right_len} rows"
    )]
    ColumnMismatch {
        left: String,
        right: String,
        left_len: usize,
        right_len: usize,
    },

    #[error("Invalid tolerance {tolerance}: must be non-negative")]
    InvalidTolerance { tolerance: f64 },

    #[error("Unknown column: {name}")]
    UnknownColumn { name: String },

    #[error("Input not found at path: {path}")]
    InputNotFound { path: PathBuf },

    #[error("Invalid input format in file: {path} - {reason}")]
    InvalidFormat { path: PathBuf, reason: String },

    #[error("Processing failed for file: {path} - {reason}")]
    ProcessingFailed { path: PathBuf, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Processing interrupted: {reason}")]
    Interrupted { reason: String },
}

impl BaseflowError {
    /// Create an invalid parameter error for a filter coefficient
    pub fn invalid_parameter(
        filter: impl Into<String>,
        parameter: impl Into<String>,
        value: f64,
        domain: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            filter: filter.into(),
            parameter: parameter.into(),
            value,
            domain: domain.into(),
        }
    }

    /// Create a column mismatch error
    pub fn column_mismatch(
        left: impl Into<String>,
        left_len: usize,
        right: impl Into<String>,
        right_len: usize,
    ) -> Self {
        Self::ColumnMismatch {
            left: left.into(),
            right: right.into(),
            left_len,
            right_len,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an invalid timestamp error
    pub fn invalid_timestamp(value: impl Into<String>) -> Self {
        Self::InvalidTimestamp {
            value: value.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BaseflowError>;
