//! Baseflow event classification.
//!
//! Two aligned numeric columns are compared row by row: a row is
//! baseflow-only when they agree within the tolerance.

use crate::error::{BaseflowError, Result};
use crate::models::Label;

/// A named numeric column taking part in a comparison
#[derive(Debug, Clone, Copy)]
pub struct NamedColumn<'a> {
    pub name: &'a str,
    pub values: &'a [f64],
}

impl<'a> NamedColumn<'a> {
    pub fn new(name: &'a str, values: &'a [f64]) -> Self {
        Self { name, values }
    }
}

pub fn validate_tolerance(tolerance: f64) -> Result<()> {
    if tolerance >= 0.0 {
        Ok(())
    } else {
        Err(BaseflowError::InvalidTolerance { tolerance })
    }
}

/// Label each row `BaseflowOnly` when `|left - right| <= tolerance`
pub fn label_rows(
    left: NamedColumn<'_>,
    right: NamedColumn<'_>,
    tolerance: f64,
) -> Result<Vec<Label>> {
    validate_tolerance(tolerance)?;
    if left.values.len() != right.values.len() {
        return Err(BaseflowError::column_mismatch(
            left.name,
            left.values.len(),
            right.name,
            right.values.len(),
        ));
    }

    Ok(left
        .values
        .iter()
        .zip(right.values)
        .map(|(l, r)| {
            if (l - r).abs() <= tolerance {
                Label::BaseflowOnly
            } else {
                Label::NotBaseflow
            }
        })
        .collect())
}

/// Number of baseflow-only rows
pub fn count_baseflow(labels: &[Label]) -> usize {
    labels
        .iter()
        .filter(|label| **label == Label::BaseflowOnly)
        .count()
}
