//! Input discovery for batch processing
//!
//! Expands the command-line inputs (files, directories or glob patterns)
//! into a sorted, de-duplicated list of gauge files.

use crate::constants::{INPUT_EXTENSIONS, OUTPUT_SUFFIX};
use crate::error::{BaseflowError, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File discovery component for gauge record inputs
#[derive(Debug, Clone)]
pub struct FileDiscovery {
    inputs: Vec<PathBuf>,
}

impl FileDiscovery {
    pub fn new(inputs: Vec<PathBuf>) -> Self {
        Self { inputs }
    }

    /// Resolve every input to concrete files.
    ///
    /// Directories are searched (non-recursively, ignoring extension case)
    /// for `*.csv`, `*.rdb` and `*.txt`; files produced by an earlier run (`*_labeled.*`) are skipped.
    /// An input that resolves to nothing fails with `InputNotFound`.
    pub fn discover_input_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = BTreeSet::new();

        for input in &self.inputs {
            let found = if input.is_file() {
                vec![input.clone()]
            } else if input.is_dir() {
                scan_directory(input)?
            } else {
                expand_pattern(input)?
            };

            if found.is_empty() {
                return Err(BaseflowError::InputNotFound {
                    path: input.clone(),
                });
            }

            debug!("{} -> {} files", input.display(), found.len());
            files.extend(found);
        }

        Ok(files.into_iter().collect())
    }
}

fn scan_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    let escaped = glob::Pattern::escape(&dir.to_string_lossy());
    let options = glob::MatchOptions {
        case_sensitive: false,
        ..glob::MatchOptions::new()
    };

    let mut files = Vec::new();
    for extension in INPUT_EXTENSIONS {
        let pattern = Path::new(&escaped).join(format!("*.{extension}"));
        files.extend(
            expand_with(&pattern.to_string_lossy(), options)?
                .into_iter()
                .filter(|path| !is_previous_output(path)),
        );
    }
    Ok(files)
}

fn expand_pattern(pattern: &Path) -> Result<Vec<PathBuf>> {
    expand_with(&pattern.to_string_lossy(), glob::MatchOptions::new())
}

fn expand_with(pattern: &str, options: glob::MatchOptions) -> Result<Vec<PathBuf>> {
    let paths = glob::glob_with(pattern, options).map_err(|e| {
        BaseflowError::configuration(format!("Invalid input pattern '{pattern}': {e}"))
    })?;

    Ok(paths
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file() && is_supported_input(path))
        .collect())
}

/// Whether the extension is one of the readable input formats
pub fn is_supported_input(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| INPUT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

fn is_previous_output(path: &Path) -> bool {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|stem| stem.ends_with(OUTPUT_SUFFIX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_inputs(temp_dir: &TempDir) -> PathBuf {
        let dir = temp_dir.path().join("gauges");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("a.csv"), "Date,Discharge\n").unwrap();
        fs::write(dir.join("b.rdb"), "# rdb\n").unwrap();
        fs::write(dir.join("c.txt"), "# rdb\n").unwrap();
        fs::write(dir.join("a_labeled.csv"), "Date\n").unwrap();
        fs::write(dir.join("notes.md"), "ignore me").unwrap();
        dir
    }

    #[test]
    fn test_directory_scan_skips_outputs_and_other_files() {
        let temp_dir = TempDir::new().unwrap();
        let dir = create_inputs(&temp_dir);

        let files = FileDiscovery::new(vec![dir]).discover_input_files().unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["a.csv", "b.rdb", "c.txt"]);
    }

    #[test]
    fn test_glob_pattern_and_duplicates() {
        let temp_dir = TempDir::new().unwrap();
        let dir = create_inputs(&temp_dir);

        let files = FileDiscovery::new(vec![dir.join("*.rdb"), dir.join("b.rdb")])
            .discover_input_files()
            .unwrap();
        assert_eq!(files, vec![dir.join("b.rdb")]);
    }

    #[test]
    fn test_unmatched_input() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nothing-*.csv");

        let result = FileDiscovery::new(vec![missing.clone()]).discover_input_files();
        match result {
            Err(BaseflowError::InputNotFound { path }) => assert_eq!(path, missing),
            other => panic!("expected InputNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_directory_with_glob_characters_and_upper_case_extension() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("data[1]");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("X.CSV"), "Date,Discharge\n").unwrap();
        fs::write(dir.join("y.rdb"), "# rdb\n").unwrap();

        let files = FileDiscovery::new(vec![dir.clone()])
            .discover_input_files()
            .unwrap();
        assert_eq!(files, vec![dir.join("X.CSV"), dir.join("y.rdb")]);
    }

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_input(Path::new("x.CSV")));
        assert!(is_supported_input(Path::new("x.rdb")));
        assert!(!is_supported_input(Path::new("x.parquet")));
        assert!(!is_supported_input(Path::new("x")));
    }
}
