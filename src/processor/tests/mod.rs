//! Integration tests for the processor module
//!
//! Exercises batch runs over temporary gauge directories.


use std::fs;
use std::path::{Path, PathBuf};

/// Write a daily CSV gauge record with a recession and one storm peak
pub fn write_gauge_csv(dir: &Path, name: &str, days: usize) -> PathBuf {
    let mut text = String::from("Date,Discharge\n");
    let first = chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    for i in 0..days {
        let date = first + chrono::Duration::days(i as i64);
        let flow = 500.0 * (-(i as f64) / 30.0).exp() + if i % 40 == 20 { 900.0 } else { 0.0 };
        text.push_str(&format!("{},{:.3}\n", date.format("%Y-%m-%d"), flow + 50.0));
    }
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}
