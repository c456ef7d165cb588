//! Command-line interface components.

use crate::calendar::CalendarField;
use crate::config::{BaseflowConfig, OutputFormat, ThresholdSpec};
use crate::constants::DEFAULT_QUANTILE;
use crate::events::{extract_periods, summarize_periods};
use crate::input::{read_labels_csv, read_series};
use crate::models::ProcessingStats;
use crate::preprocess::{GapPolicy, fill_gaps};
use crate::processor::BaseflowProcessor;
use crate::processor::writer::write_table;
use crate::quantile::threshold_summary;
use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "baseflow")]
#[command(about = "Separate baseflow from river discharge records and label baseflow events")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the filter bank, thresholds and labeling over gauge files
    Process(ProcessArgs),
    /// Write the seasonal threshold summary table for one gauge file
    Thresholds(ThresholdsArgs),
    /// Summarise baseflow-only periods of a labeled CSV table
    Periods(PeriodsArgs),
}

/// Logging verbosity shared by every command
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct Verbosity {
    /// Increase logging (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only show errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Verbosity {
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }
}

#[derive(ClapArgs, Debug)]
pub struct ProcessArgs {
    /// Gauge files, directories or glob patterns
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output directory for labeled tables
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    #[arg(long, value_enum)]
    pub gap_policy: Option<GapPolicy>,

    /// Classifier tolerance in discharge units
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Quantile of the threshold column (replaces configured thresholds)
    #[arg(long)]
    pub quantile: Option<f64>,

    /// Calendar field the threshold is grouped by
    #[arg(long, value_enum)]
    pub group_by: Option<CalendarField>,

    /// Number of files processed concurrently
    #[arg(short, long)]
    pub workers: Option<usize>,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

#[derive(ClapArgs, Debug)]
pub struct ThresholdsArgs {
    /// Gauge file (.csv, .rdb or .txt)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    #[arg(long, default_value_t = DEFAULT_QUANTILE)]
    pub quantile: f64,

    /// Output file; `.parquet` selects Parquet, anything else CSV
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// TOML configuration file (input columns, gap policy)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

#[derive(ClapArgs, Debug)]
pub struct PeriodsArgs {
    /// Labeled CSV table with Date and Label columns
    #[arg(value_name = "LABELED_CSV")]
    pub input: PathBuf,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

impl Commands {
    pub fn verbosity(&self) -> &Verbosity {
        match self {
            Commands::Process(args) => &args.verbosity,
            Commands::Thresholds(args) => &args.verbosity,
            Commands::Periods(args) => &args.verbosity,
        }
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(verbosity: &Verbosity) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = verbosity.get_log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("baseflow_processor={}", log_level)));

    if verbosity.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
}

/// Defaults, then the config file, then command-line overrides
pub fn load_configuration(config_file: Option<&Path>) -> Result<BaseflowConfig> {
    match config_file {
        Some(path) => info!("Using config file: {}", path.display()),
        None => debug!(
            "No --config given; checking {}",
            BaseflowConfig::default_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<no config dir>".to_string())
        ),
    }
    BaseflowConfig::load_layered(config_file).context("Failed to load configuration")
}

pub fn apply_cli_overrides(config: &mut BaseflowConfig, args: &ProcessArgs) {
    if let Some(format) = args.format {
        config.output_format = format;
    }
    if let Some(gap_policy) = args.gap_policy {
        config.gap_policy = gap_policy;
    }
    if let Some(tolerance) = args.tolerance {
        config
            .label
            .get_or_insert_with(Default::default)
            .tolerance = tolerance;
    }
    if args.quantile.is_some() || args.group_by.is_some() {
        let current = config.thresholds.first().copied();
        config.thresholds = vec![ThresholdSpec::new(
            args.group_by
                .or(current.map(|t| t.field))
                .unwrap_or(CalendarField::Month),
            args.quantile
                .or(current.map(|t| t.quantile))
                .unwrap_or(DEFAULT_QUANTILE),
        )];
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
}

/// Dispatch to the selected subcommand
pub async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Process(args) => run_process(args).await.map(|_| ()),
        Commands::Thresholds(args) => run_thresholds(args),
        Commands::Periods(args) => run_periods(args),
    }
}

pub async fn run_process(args: ProcessArgs) -> Result<ProcessingStats> {
    let mut config = load_configuration(args.config.as_deref())?;
    apply_cli_overrides(&mut config, &args);
    config.validate().context("Invalid configuration")?;

    let mut processor =
        BaseflowProcessor::new(args.inputs.clone(), args.output.clone()).with_config(config);
    if args.verbosity.quiet {
        processor = processor.without_progress();
    }

    let stats = processor.process().await?;
    if stats.files_processed == 0 && stats.files_failed > 0 {
        anyhow::bail!("all {} input files failed", stats.files_failed);
    }
    Ok(stats)
}

pub fn run_thresholds(args: ThresholdsArgs) -> Result<()> {
    let config = load_configuration(args.config.as_deref())?;
    let series = read_series(&args.input, &config.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let dense = fill_gaps(&series, config.gap_policy)?;
    let mut table = threshold_summary(&dense, args.quantile)?.to_dataframe()?;

    let output = args.output.unwrap_or_else(|| {
        let stem = args
            .input
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "series".to_string());
        PathBuf::from(format!("{stem}_thresholds.csv"))
    });
    let format = match output.extension().and_then(|e| e.to_str()) {
        Some("parquet") => OutputFormat::Parquet,
        _ => OutputFormat::Csv,
    };
    write_table(&mut table, &output, format)?;

    println!(
        "{} {} rows ({} quantile) to {}",
        "Wrote".bright_green(),
        table.height().to_string().bright_white().bold(),
        args.quantile,
        output.display()
    );
    Ok(())
}

pub fn run_periods(args: PeriodsArgs) -> Result<()> {
    let (timestamps, labels) = read_labels_csv(&args.input)
        .with_context(|| format!("Failed to read labels from {}", args.input.display()))?;
    let periods = extract_periods(&timestamps, &labels)?;
    let summary = summarize_periods(&periods);

    println!(
        "{} {}",
        "Baseflow periods:".bright_green().bold(),
        summary.period_count.to_string().bright_white().bold()
    );

    println!("\n{}", "Per start year (total days, mean days)".bright_cyan());
    for (year, total) in &summary.total_duration_by_year {
        println!(
            "  {}  {:>6}  {:>8.1}",
            year,
            total,
            summary.average_duration_by_year[year]
        );
    }

    println!("\n{}", "Per start month (total days)".bright_cyan());
    for (month, total) in &summary.total_duration_by_month {
        println!("  {:>2}  {:>6}", month, total);
    }

    println!("\n{}", "Per season (total days)".bright_cyan());
    for (season, total) in &summary.total_duration_by_season {
        println!("  {:<6}  {:>6}", season.name(), total);
    }

    Ok(())
}
