//! Calendar decomposition of series timestamps.
//!
//! Seasons use fixed day-of-year windows rather than astronomical
//! equinoxes: 80-171 spring, 172-265 summer, 266-355 autumn, otherwise
//! winter.

use crate::constants::*;
use crate::error::{BaseflowError, Result};
use crate::models::{CalendarFields, Season};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Calendar attribute used as a grouping key
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum CalendarField {
    Year,
    Month,
    /// Day of month
    Day,
    /// ISO 8601 week number
    Week,
    DayOfYear,
    Season,
}

impl CalendarField {
    pub fn column_name(self) -> &'static str {
        match self {
            CalendarField::Year => COL_YEAR,
            CalendarField::Month => COL_MONTH,
            CalendarField::Day => COL_DAY,
            CalendarField::Week => COL_WEEK,
            CalendarField::DayOfYear => COL_DAY_OF_YEAR,
            CalendarField::Season => COL_SEASON,
        }
    }

    /// Integer group key of `fields` for this attribute
    pub fn key(self, fields: &CalendarFields) -> i32 {
        match self {
            CalendarField::Year => fields.year,
            CalendarField::Month => fields.month as i32,
            CalendarField::Day => fields.day as i32,
            CalendarField::Week => fields.iso_week as i32,
            CalendarField::DayOfYear => fields.day_of_year as i32,
            CalendarField::Season => fields.season.index(),
        }
    }
}

/// Parse a date or date-time string as delivered by gauge records.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM[:SS]` (space or `T`) and
/// RFC 3339 with an offset, which keeps the local wall-clock time.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    let trimmed = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| BaseflowError::invalid_timestamp(value));
    }

    for format in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(ts);
        }
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|ts| ts.naive_local())
        .map_err(|_| BaseflowError::invalid_timestamp(value))
}

pub fn season_for_day_of_year(day_of_year: u32) -> Season {
    if (SPRING_START_DOY..SUMMER_START_DOY).contains(&day_of_year) {
        Season::Spring
    } else if (SUMMER_START_DOY..AUTUMN_START_DOY).contains(&day_of_year) {
        Season::Summer
    } else if (AUTUMN_START_DOY..WINTER_START_DOY).contains(&day_of_year) {
        Season::Autumn
    } else {
        Season::Winter
    }
}

pub fn decompose(timestamp: &NaiveDateTime) -> CalendarFields {
    let day_of_year = timestamp.ordinal();
    CalendarFields {
        year: timestamp.year(),
        month: timestamp.month(),
        day: timestamp.day(),
        iso_week: timestamp.iso_week().week(),
        day_of_year,
        season: season_for_day_of_year(day_of_year),
    }
}

/// Parse then decompose a textual timestamp
pub fn decompose_str(value: &str) -> Result<CalendarFields> {
    parse_timestamp(value).map(|ts| decompose(&ts))
}

pub fn decompose_all(timestamps: &[NaiveDateTime]) -> Vec<CalendarFields> {
    timestamps.iter().map(decompose).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decompose_fields() {
        let fields = decompose_str("2019-06-10").unwrap();
        assert_eq!(fields.year, 2019);
        assert_eq!(fields.month, 6);
        assert_eq!(fields.day, 10);
        assert_eq!(fields.iso_week, 24);
        assert_eq!(fields.day_of_year, 161);
        assert_eq!(fields.season, Season::Spring);
    }

    #[test]
    fn test_iso_week_crosses_year_boundary() {
        // 2018-12-31 is a Monday in ISO week 1 of 2019
        let fields = decompose_str("2018-12-31").unwrap();
        assert_eq!(fields.iso_week, 1);
        assert_eq!(fields.year, 2018);
    }

    #[test]
    fn test_season_boundaries() {
        assert_eq!(season_for_day_of_year(1), Season::Winter);
        assert_eq!(season_for_day_of_year(79), Season::Winter);
        assert_eq!(season_for_day_of_year(80), Season::Spring);
        assert_eq!(season_for_day_of_year(171), Season::Spring);
        assert_eq!(season_for_day_of_year(172), Season::Summer);
        assert_eq!(season_for_day_of_year(265), Season::Summer);
        assert_eq!(season_for_day_of_year(266), Season::Autumn);
        assert_eq!(season_for_day_of_year(355), Season::Autumn);
        assert_eq!(season_for_day_of_year(356), Season::Winter);
        assert_eq!(season_for_day_of_year(366), Season::Winter);
    }

    #[test]
    fn test_parse_sub_daily_and_offset_timestamps() {
        let ts = parse_timestamp("2024-05-01 12:15").unwrap();
        assert_eq!(ts.to_string(), "2024-05-01 12:15:00");

        let ts = parse_timestamp("2024-05-01T08:00:00-05:00").unwrap();
        assert_eq!(ts.to_string(), "2024-05-01 08:00:00");
    }

    #[test]
    fn test_malformed_timestamp() {
        for bad in ["", "2019-13-01", "yesterday", "2019/06/10"] {
            assert!(
                matches!(decompose_str(bad), Err(BaseflowError::InvalidTimestamp { .. })),
                "'{bad}' should be rejected"
            );
        }
    }

    #[test]
    fn test_field_keys() {
        let fields = decompose_str("2020-12-25").unwrap();
        assert_eq!(CalendarField::Year.key(&fields), 2020);
        assert_eq!(CalendarField::Month.key(&fields), 12);
        assert_eq!(CalendarField::Day.key(&fields), 25);
        assert_eq!(CalendarField::DayOfYear.key(&fields), 360);
        assert_eq!(CalendarField::Season.key(&fields), 1);
        assert_eq!(CalendarField::Week.column_name(), "Week");
    }
}
