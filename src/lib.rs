//! Baseflow Processor Library
//!
//! Separates the baseflow component of river discharge records and labels
//! baseflow-dominated time steps.
//!
//! This library provides tools for:
//! - Reading gauge records from CSV tables and USGS RDB daily values
//! - Removing gaps by dropping or forward-filling missing values
//! - A bank of recursive digital filters (Lyne-Hollick, Chapman, Eckhardt,
//!   Chapman-Maxwell, Boughton, Furey-Gupta, TR-55 runoff, HydRun multi-pass)
//! - Calendar decomposition and per-group quantile thresholds
//! - Baseflow event labeling and baseflow period summaries
//! - Concurrent batch processing with CSV or Parquet output

pub mod calendar;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod filters;
pub mod input;
pub mod models;
pub mod pipeline;
pub mod preprocess;
pub mod processor;
pub mod quantile;

pub use config::BaseflowConfig;
pub use error::{BaseflowError, Result};
pub use filters::FilterSpec;
pub use models::{BaseflowSeries, DenseSeries, DischargeSeries, Label, Observation};
pub use pipeline::{PipelineOutput, run_pipeline};
pub use processor::BaseflowProcessor;
