//! Batch processing engine.
//!
//! Discovers gauge files, runs the labeling pipeline for each one on the
//! blocking thread pool (bounded by the configured worker count) and
//! writes one output table per input. Inputs that would share an output
//! file are rejected before anything is read. A failing file is logged and
//! counted; it never stops the other files.

pub mod discovery;
pub mod writer;

#[cfg(test)]
pub mod tests;

use self::{discovery::FileDiscovery, writer::TableWriter};

use crate::config::BaseflowConfig;
use crate::error::{BaseflowError, Result};
use crate::input::read_series;
use crate::models::ProcessingStats;
use crate::pipeline::run_pipeline;

use colored::*;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task;
use tracing::{info, warn};

/// Result of processing one input file
#[derive(Debug, Clone, PartialEq)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub rows: usize,
    pub baseflow_rows: usize,
}

/// Read, label and write a single input file
pub fn process_file(
    input: &Path,
    config: &BaseflowConfig,
    writer: &TableWriter,
) -> Result<FileOutcome> {
    let series = read_series(input, &config.input)?;
    let mut output = run_pipeline(&series, config)?;
    let path = writer.write(input, &mut output.table)?;

    Ok(FileOutcome {
        input: input.to_path_buf(),
        output: path,
        rows: output.rows(),
        baseflow_rows: output.baseflow_rows(),
    })
}

/// Fail when two inputs would be written to the same output file
pub fn check_output_collisions(files: &[PathBuf], writer: &TableWriter) -> Result<()> {
    let mut targets: HashMap<PathBuf, &Path> = HashMap::new();
    for input in files {
        let output = writer.output_path_for(input);
        if let Some(previous) = targets.insert(output.clone(), input) {
            return Err(BaseflowError::configuration(format!(
                "{} and {} would both be written to {}",
                previous.display(),
                input.display(),
                output.display()
            )));
        }
    }
    Ok(())
}

fn progress_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        bar.set_style(style.progress_chars("#>-"));
    }
    bar
}

/// Main processor for batches of gauge files
#[derive(Debug)]
pub struct BaseflowProcessor {
    inputs: Vec<PathBuf>,
    output_dir: PathBuf,
    config: BaseflowConfig,
    show_progress: bool,
}

impl BaseflowProcessor {
    pub fn new(inputs: Vec<PathBuf>, output_dir: PathBuf) -> Self {
        Self {
            inputs,
            output_dir,
            config: BaseflowConfig::default(),
            show_progress: true,
        }
    }

    /// Configure the processor
    pub fn with_config(mut self, config: BaseflowConfig) -> Self {
        self.config = config;
        self
    }

    /// Hide the progress bar (tests, quiet mode)
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Main processing entry point
    pub async fn process(&self) -> Result<ProcessingStats> {
        let start_time = Instant::now();
        self.config.validate()?;

        println!("{}", "Starting baseflow processing".bright_green().bold());
        println!(
            "  {} {}",
            "Output:".bright_cyan(),
            self.output_dir.display()
        );

        let files = FileDiscovery::new(self.inputs.clone()).discover_input_files()?;
        println!(
            "  {} {} input files",
            "Found".bright_green(),
            files.len().to_string().bright_white().bold()
        );

        let writer = TableWriter::new(self.output_dir.clone(), self.config.output_format);
        check_output_collisions(&files, &writer)?;

        tokio::fs::create_dir_all(&self.output_dir).await?;

        let workers = self.config.workers.max(1);
        let semaphore = Arc::new(Semaphore::new(workers));
        let config = Arc::new(self.config.clone());
        let writer = Arc::new(writer);
        let progress = self
            .show_progress
            .then(|| progress_bar(files.len() as u64));

        let results = stream::iter(files)
            .map(|path| {
                let semaphore = semaphore.clone();
                let config = config.clone();
                let writer = writer.clone();
                let progress = progress.clone();
                async move {
                    let task_path = path.clone();
                    let result = match semaphore.acquire().await {
                        Ok(_permit) => task::spawn_blocking(move || {
                            process_file(&task_path, &config, &writer)
                        })
                        .await
                        .unwrap_or_else(|e| {
                            Err(BaseflowError::ProcessingFailed {
                                path: path.clone(),
                                reason: format!("worker task failed: {e}"),
                            })
                        }),
                        Err(e) => Err(BaseflowError::Interrupted {
                            reason: e.to_string(),
                        }),
                    };
                    if let Some(bar) = &progress {
                        bar.inc(1);
                    }
                    (path, result)
                }
            })
            .buffer_unordered(workers)
            .collect::<Vec<_>>()
            .await;

        if let Some(bar) = &progress {
            bar.finish_and_clear();
        }

        let mut stats = ProcessingStats::default();
        for (path, result) in results {
            match result {
                Ok(outcome) => {
                    info!(
                        "{}: {} rows, {} baseflow-only -> {}",
                        path.display(),
                        outcome.rows,
                        outcome.baseflow_rows,
                        outcome.output.display()
                    );
                    stats.files_processed += 1;
                    stats.total_rows += outcome.rows;
                    stats.baseflow_rows += outcome.baseflow_rows;
                    stats.output_paths.push(outcome.output);
                }
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    stats.files_failed += 1;
                }
            }
        }
        stats.output_paths.sort();
        stats.processing_time_ms = start_time.elapsed().as_millis();

        print_summary(&stats);
        Ok(stats)
    }
}

fn print_summary(stats: &ProcessingStats) {
    println!("\n{}", "Processing Summary".bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time_ms.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Files processed:".bright_cyan(),
        stats.files_processed.to_string().bright_white()
    );
    if stats.files_failed > 0 {
        println!(
            "  {} {}",
            "Files failed:".bright_red(),
            stats.files_failed.to_string().bright_red().bold()
        );
    }
    println!(
        "  {} {}",
        "Total rows:".bright_cyan(),
        stats.total_rows.to_string().bright_white().bold()
    );
    println!(
        "  {} {} ({:.1}%)",
        "Baseflow-only rows:".bright_cyan(),
        stats.baseflow_rows.to_string().bright_white().bold(),
        stats.baseflow_share()
    );
}
