//! Application constants for the baseflow processor
//!
//! Column names, label values, default filter coefficients and the
//! calendar boundaries used throughout the pipeline.

// =============================================================================
// Table Column Names
// =============================================================================

pub const COL_DATE: &str = "Date";
pub const COL_DISCHARGE: &str = "Discharge";
pub const COL_LABEL: &str = "Label";

pub const COL_YEAR: &str = "Year";
pub const COL_MONTH: &str = "Month";
pub const COL_DAY: &str = "Day";
pub const COL_WEEK: &str = "Week";
pub const COL_DAY_OF_YEAR: &str = "DayOfYear";
pub const COL_SEASON: &str = "Season";

/// Calendar columns in the order they are attached to the output table
pub const CALENDAR_COLUMNS: &[&str] = &[
    COL_YEAR,
    COL_MONTH,
    COL_DAY,
    COL_WEEK,
    COL_DAY_OF_YEAR,
    COL_SEASON,
];

/// Suffix appended to the Chapman-Maxwell column for its clamped quickflow
pub const QUICKFLOW_SUFFIX: &str = "_Quickflow";

// =============================================================================
// Labels
// =============================================================================

/// Label for rows where the compared columns agree within tolerance
pub const LABEL_BASEFLOW_ONLY: &str = "BFO";

/// Label for every other row
pub const LABEL_NOT_BASEFLOW: &str = "NBF";

// =============================================================================
// Default Filter Coefficients
// =============================================================================

pub const DEFAULT_LYNE_HOLLICK_ALPHA: f64 = 0.925;
pub const DEFAULT_CHAPMAN_ALPHA: f64 = 0.925;
pub const DEFAULT_ECKHARDT_ALPHA: f64 = 0.8;
pub const DEFAULT_ECKHARDT_BFI_MAX: f64 = 0.6;
pub const DEFAULT_CHAPMAN_MAXWELL_K: f64 = 0.7;
pub const DEFAULT_HYDRUN_K: f64 = 0.925;
pub const DEFAULT_HYDRUN_PASSES: usize = 3;

/// Default quantile used for the monthly threshold column
pub const DEFAULT_QUANTILE: f64 = 0.9;

/// Default tolerance (discharge units) for the event classifier
pub const DEFAULT_TOLERANCE: f64 = 200.0;

// =============================================================================
// Calendar
// =============================================================================

/// First day-of-year of each fixed season window (spring, summer, autumn).
/// Days before spring or from the winter start onwards fall in winter.
pub const SPRING_START_DOY: u32 = 80;
pub const SUMMER_START_DOY: u32 = 172;
pub const AUTUMN_START_DOY: u32 = 266;
pub const WINTER_START_DOY: u32 = 356;

// =============================================================================
// Input Formats
// =============================================================================

/// File extensions picked up when an input directory is scanned
pub const INPUT_EXTENSIONS: &[&str] = &["csv", "rdb", "txt"];

/// USGS value codes that stand in for a missing daily value
pub const USGS_MISSING_CODES: &[&str] = &[
    "Ice", "Eqp", "Ssn", "Bkw", "Dis", "Dry", "Fld", "Mnt", "Pr", "Rat", "Tst", "Zfl", "***",
];

/// Config directory name under the platform config root
pub const CONFIG_DIR_NAME: &str = "baseflow-processor";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Suffix for per-input output files
pub const OUTPUT_SUFFIX: &str = "_labeled";
