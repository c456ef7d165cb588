//! Output table writing
//!
//! Persists labeled tables as CSV (with header) or Snappy-compressed
//! Parquet, one file per input named `<stem>_labeled.<ext>`.

use crate::config::OutputFormat;
use crate::constants::OUTPUT_SUFFIX;
use crate::error::{BaseflowError, Result};
use polars::prelude::{
    CsvWriter, DataFrame, ParquetCompression, ParquetWriter as PolarsParquetWriter, SerWriter,
};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Table writer bound to an output directory and format
#[derive(Debug, Clone)]
pub struct TableWriter {
    output_dir: PathBuf,
    format: OutputFormat,
}

impl TableWriter {
    pub fn new(output_dir: PathBuf, format: OutputFormat) -> Self {
        Self { output_dir, format }
    }

    /// Output location for `input`
    pub fn output_path_for(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "series".to_string());
        self.output_dir
            .join(format!("{stem}{OUTPUT_SUFFIX}.{}", self.format.extension()))
    }

    /// Write `table` for `input`, returning the path written
    pub fn write(&self, input: &Path, table: &mut DataFrame) -> Result<PathBuf> {
        let path = self.output_path_for(input);
        write_table(table, &path, self.format)?;
        Ok(path)
    }
}

/// Write `table` to `path` in `format`, creating parent directories
pub fn write_table(table: &mut DataFrame, path: &Path, format: OutputFormat) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    let written = match format {
        OutputFormat::Csv => CsvWriter::new(&mut file).include_header(true).finish(table),
        OutputFormat::Parquet => PolarsParquetWriter::new(file)
            .with_compression(ParquetCompression::Snappy)
            .finish(table)
            .map(|_| ()),
    };

    written.map_err(|e| BaseflowError::ProcessingFailed {
        path: path.to_path_buf(),
        reason: format!("Failed to write {:?} output: {}", format, e),
    })?;

    debug!(
        "Wrote {} rows x {} columns to {}",
        table.height(),
        table.width(),
        path.display()
    );
    Ok(())
}
